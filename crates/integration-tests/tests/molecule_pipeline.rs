//! Molecule round trip through a file-based "simulation" tool
//!
//! The domain object and its XYZ translation live only in this test; the
//! adapter never looks inside the molecule.

#![cfg(unix)]

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use toolbridge_core::application::JsonFileMappings;
use toolbridge_core::domain::{AdapterConfig, ScratchDir};
use toolbridge_core::port::MappingError;
use toolbridge_core::{AdapterError, Outcome, ToolAdapter};
use toolbridge_infra_system::{RunnerConfig, ShellProcessRunner};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Atom {
    element: String,
    position: [f64; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Molecule {
    name: String,
    atoms: Vec<Atom>,
}

impl Molecule {
    fn water() -> Self {
        let atom = |element: &str, position: [f64; 3]| Atom {
            element: element.to_string(),
            position,
        };
        Self {
            name: "water".to_string(),
            atoms: vec![
                atom("O", [0.0, 0.0, 0.1173]),
                atom("H", [0.0, 0.7572, -0.4692]),
                atom("H", [0.0, -0.7572, -0.4692]),
            ],
        }
    }

    fn to_xyz(&self) -> String {
        let mut xyz = format!("{}\n{}\n", self.atoms.len(), self.name);
        for atom in &self.atoms {
            let [x, y, z] = atom.position;
            xyz.push_str(&format!("{} {:.4} {:.4} {:.4}\n", atom.element, x, y, z));
        }
        xyz
    }
}

/// Counts atom lines of an XYZ file, standing in for a simulation binary
const ATOM_COUNTER: &str = "awk 'NR > 2 { n++ } END { print n }'";

fn runner() -> Arc<ShellProcessRunner> {
    Arc::new(ShellProcessRunner::default())
}

#[tokio::test]
async fn test_molecule_xyz_round_trip() {
    let adapter = ToolAdapter::<Molecule, usize, usize>::builder()
        .executable(ATOM_COUNTER)
        .input_path("mol.xyz")
        .output_path("count.txt")
        .scratch_dir(ScratchDir::Temporary)
        .input_fn(|ctx, mol: &Molecule| {
            let xyz = mol.to_xyz();
            ctx.write_input(&xyz)?;
            Ok(xyz.len())
        })
        .output_fn(|ctx, _mol| {
            let text = ctx.read_output()?;
            text.trim()
                .parse()
                .map_err(|e| MappingError::Parse(format!("atom count {:?}: {}", text, e)))
        })
        .runner(runner())
        .build()
        .unwrap();

    let molecule = Molecule::water();

    let written = adapter.map_input(&molecule).success().unwrap();
    assert!(written > 0);

    let run = adapter.run_command(None).await.success().unwrap();
    assert!(run.status.success(), "stderr: {}", run.stderr_lossy());

    let atoms = adapter.map_output(&molecule).success().unwrap();
    assert_eq!(atoms, 3);
}

#[tokio::test]
async fn test_json_factory_pipeline_from_config() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Report {
        name: String,
        atoms: Vec<Atom>,
    }

    // `cat` echoes the JSON input back as the "result"
    let config: AdapterConfig = serde_json::from_value(json!({
        "executable": "cat",
        "input_path": "mol.json",
        "output_path": "report.json",
        "temporary_scratch": true,
        "params": {"method": "gfn2"}
    }))
    .unwrap();

    let adapter: ToolAdapter<Molecule, (), Report> = ToolAdapter::builder()
        .config(&config)
        .mapping_factory(JsonFileMappings::new())
        .runner(runner())
        .build()
        .unwrap();

    assert_eq!(adapter.params()["method"], "gfn2");
    assert!(adapter.scratch_dir().is_some());

    let molecule = Molecule::water();
    assert!(adapter.map_input(&molecule).is_success());
    assert!(adapter.run_command(None).await.is_success());

    let report = adapter.map_output(&molecule).success().unwrap();
    assert_eq!(report.name, "water");
    assert_eq!(report.atoms.len(), 3);
    assert_eq!(report.atoms[0].element, "O");
}

#[tokio::test]
async fn test_tool_error_surfaces_in_output_mapping() {
    let adapter = ToolAdapter::<Molecule, (), serde_json::Value>::builder()
        .executable("echo 'SCF did not converge' >&2; false")
        .output_path("result.json")
        .scratch_dir(ScratchDir::Temporary)
        .mapping_factory(JsonFileMappings::new())
        .runner(runner())
        .build()
        .unwrap();

    let run = adapter.run_command(None).await.success().unwrap();
    assert_eq!(run.status.code(), Some(1));
    assert!(run.stderr_lossy().contains("SCF did not converge"));

    // Only the redirect touched the output file: it exists but is empty
    match adapter.map_output(&Molecule::water()) {
        Outcome::Failed(AdapterError::Mapping(MappingError::Serialization(_))) => {}
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_runner_timeout_is_failed_outcome() {
    let runner = Arc::new(ShellProcessRunner::new(
        Arc::new(toolbridge_core::port::time_provider::SystemTimeProvider),
        RunnerConfig {
            timeout_ms: Some(100),
            ..Default::default()
        },
    ));
    let adapter = ToolAdapter::<Molecule, (), serde_json::Value>::builder()
        .executable("sleep 5")
        .mapping_factory(JsonFileMappings::new())
        .runner(runner)
        .build()
        .unwrap();

    assert!(matches!(
        adapter.run_command(None).await,
        Outcome::Failed(AdapterError::Run(_))
    ));
}
