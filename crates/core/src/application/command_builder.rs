// Command line assembly

use crate::domain::{CommandLine, PathStyle, ToolSpec, Unconfigured, REDIRECT_MARKER};
use crate::port::PathResolver;
use std::path::Path;

/// Assemble the command line for a tool spec
///
/// Fragments are appended in a fixed order, each only when configured:
/// `<executable>[ <input>][ <options>][ > <output>]`.
///
/// Pure: nothing is executed and the output file is never read back here.
/// Returns `Unconfigured::NoExecutable` when there is nothing to run.
pub fn build_command(
    spec: &ToolSpec,
    resolver: &dyn PathResolver,
    scratch_dir: Option<&Path>,
) -> Result<CommandLine, Unconfigured> {
    let executable = spec.executable().ok_or(Unconfigured::NoExecutable)?;

    let render = |path: &Path| -> String {
        match spec.path_style {
            PathStyle::Absolute => resolver.absolute(path, scratch_dir).display().to_string(),
            PathStyle::AsGiven => path.display().to_string(),
        }
    };

    let mut command = String::from(executable);

    if let Some(input) = &spec.input_path {
        command.push(' ');
        command.push_str(&render(input));
    }

    if let Some(options) = spec.trailing_options() {
        command.push(' ');
        command.push_str(options);
    }

    if let Some(output) = &spec.output_path {
        command.push(' ');
        command.push_str(REDIRECT_MARKER);
        command.push(' ');
        command.push_str(&render(output));
    }

    Ok(CommandLine::new(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::StdPathResolver;
    use std::path::PathBuf;

    fn full_spec(style: PathStyle) -> ToolSpec {
        ToolSpec {
            executable: Some("simulate".to_string()),
            input_path: Some(PathBuf::from("mol.in")),
            output_path: Some(PathBuf::from("mol.out")),
            trailing_options: Some("--steps 10".to_string()),
            path_style: style,
        }
    }

    #[test]
    fn test_no_executable() {
        let spec = ToolSpec {
            input_path: Some(PathBuf::from("in.txt")),
            ..Default::default()
        };
        let result = build_command(&spec, &StdPathResolver, None);
        assert_eq!(result, Err(Unconfigured::NoExecutable));
    }

    #[test]
    fn test_executable_only() {
        let spec = ToolSpec::new("echo hi");
        let command = build_command(&spec, &StdPathResolver, None).unwrap();
        assert_eq!(command.as_str(), "echo hi");
    }

    #[test]
    fn test_full_command_as_given() {
        let spec = full_spec(PathStyle::AsGiven);
        let command = build_command(&spec, &StdPathResolver, None).unwrap();
        assert_eq!(command.as_str(), "simulate mol.in --steps 10 > mol.out");
    }

    #[test]
    fn test_full_command_absolute_in_scratch() {
        let spec = full_spec(PathStyle::Absolute);
        let command =
            build_command(&spec, &StdPathResolver, Some(Path::new("/scratch/run1"))).unwrap();
        assert_eq!(
            command.as_str(),
            "simulate /scratch/run1/mol.in --steps 10 > /scratch/run1/mol.out"
        );
    }

    #[test]
    fn test_output_without_input() {
        let spec = ToolSpec {
            executable: Some("date".to_string()),
            output_path: Some(PathBuf::from("/tmp/date.txt")),
            ..Default::default()
        };
        let command = build_command(&spec, &StdPathResolver, None).unwrap();
        assert_eq!(command.as_str(), "date > /tmp/date.txt");
    }

    #[test]
    fn test_blank_options_are_skipped() {
        let spec = ToolSpec {
            executable: Some("cat".to_string()),
            input_path: Some(PathBuf::from("in.txt")),
            trailing_options: Some("  ".to_string()),
            path_style: PathStyle::AsGiven,
            ..Default::default()
        };
        let command = build_command(&spec, &StdPathResolver, None).unwrap();
        assert_eq!(command.as_str(), "cat in.txt");
    }

    #[test]
    fn test_options_appended_verbatim() {
        let spec = ToolSpec {
            executable: Some("cat".to_string()),
            input_path: Some(PathBuf::from("in.txt")),
            trailing_options: Some(" -n ".to_string()),
            path_style: PathStyle::AsGiven,
            ..Default::default()
        };
        let command = build_command(&spec, &StdPathResolver, None).unwrap();
        assert_eq!(command.as_str(), "cat in.txt  -n ");
    }

    #[test]
    fn test_build_is_idempotent() {
        let spec = full_spec(PathStyle::Absolute);
        let first = build_command(&spec, &StdPathResolver, None).unwrap();
        let second = build_command(&spec, &StdPathResolver, None).unwrap();
        assert_eq!(first.as_str().as_bytes(), second.as_str().as_bytes());
    }
}
