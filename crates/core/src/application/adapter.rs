// Tool Adapter - configures, scopes and runs one external-tool invocation

use crate::application::command_builder::build_command;
use crate::application::panic_guard::catch_mapping_panic;
use crate::application::scratch::ScratchScope;
use crate::domain::{
    AdapterConfig, CommandLine, Outcome, PathStyle, RunOutput, ScratchDir, ToolSpec, Unconfigured,
};
use crate::error::{AdapterError, Result};
use crate::port::id_provider::UuidProvider;
use crate::port::{
    IdProvider, InputMapping, MappingContext, MappingError, MappingFactory, OutputMapping,
    PathResolver, ProcessRunner, RunRequest, StdPathResolver,
};
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Adapter for one invocation of an external, file-based tool
///
/// Type parameters:
/// - `D`: the domain object being translated (never inspected here)
/// - `I`: value produced by the input mapping
/// - `O`: value produced by the output mapping
///
/// Mapping strategies are resolved once, at construction; configuration is
/// immutable afterwards, so the memoized command line never goes stale.
///
/// # Example
/// ```text
/// let adapter = ToolAdapter::<Molecule, (), Energy>::builder()
///     .executable("xtb")
///     .input_path("mol.xyz")
///     .output_path("energy.json")
///     .scratch_dir(ScratchDir::Temporary)
///     .input_fn(|ctx, mol| ctx.write_input(mol.to_xyz()))
///     .output_mapping(ReadJson::new())
///     .runner(Arc::new(ShellProcessRunner::default()))
///     .build()?;
///
/// adapter.map_input(&molecule).into_result()?;
/// let run = adapter.run_command(None).await.into_result()?;
/// let energy = adapter.map_output(&molecule).into_result()?;
/// ```
pub struct ToolAdapter<D: ?Sized, I, O> {
    id: String,
    spec: ToolSpec,
    scope: ScratchScope,
    params: serde_json::Value,
    input_mapping: Arc<dyn InputMapping<D, I>>,
    output_mapping: Arc<dyn OutputMapping<D, O>>,
    runner: Arc<dyn ProcessRunner>,
    path_resolver: Arc<dyn PathResolver>,
    last_command: OnceLock<std::result::Result<CommandLine, Unconfigured>>,
}

impl<D: ?Sized, I, O> ToolAdapter<D, I, O> {
    pub fn builder() -> ToolAdapterBuilder<D, I, O> {
        ToolAdapterBuilder::new()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    pub fn params(&self) -> &serde_json::Value {
        &self.params
    }

    /// Scratch directory, if scoping is active
    pub fn scratch_dir(&self) -> Option<&Path> {
        self.scope.dir()
    }

    /// Assemble the command line from the current configuration
    pub fn build_command(&self) -> std::result::Result<CommandLine, Unconfigured> {
        build_command(&self.spec, self.path_resolver.as_ref(), self.scope.dir())
    }

    /// The command line, built on first use and memoized
    pub fn last_command(&self) -> std::result::Result<&CommandLine, Unconfigured> {
        self.last_command
            .get_or_init(|| self.build_command())
            .as_ref()
            .map_err(|missing| *missing)
    }

    pub fn has_last_command(&self) -> bool {
        matches!(self.last_command.get(), Some(Ok(_)))
    }

    /// Whether the executable's program resolves (on `PATH` or as a path)
    pub fn executable_available(&self) -> bool {
        self.spec
            .program()
            .and_then(|program| self.path_resolver.find_executable(program))
            .is_some()
    }

    /// Absolute location of the input file, if configured
    pub fn input_location(&self) -> Option<PathBuf> {
        self.spec
            .input_path
            .as_deref()
            .map(|p| self.path_resolver.absolute(p, self.scope.dir()))
    }

    /// Absolute location of the output file, if configured
    pub fn output_location(&self) -> Option<PathBuf> {
        self.spec
            .output_path
            .as_deref()
            .map(|p| self.path_resolver.absolute(p, self.scope.dir()))
    }

    pub fn input_exists(&self) -> bool {
        self.input_location()
            .is_some_and(|p| self.path_resolver.exists(&p))
    }

    pub fn output_exists(&self) -> bool {
        self.output_location()
            .is_some_and(|p| self.path_resolver.exists(&p))
    }

    /// Produce the tool's input from `domain`
    ///
    /// Requires an input path; otherwise logs one warning and returns
    /// `Outcome::NotConfigured(Unconfigured::NoInputPath)`.
    pub fn map_input(&self, domain: &D) -> Outcome<I> {
        if !self.spec.has_input_path() {
            warn!(adapter_id = %self.id, "Input mapping skipped: no input path configured");
            return Outcome::NotConfigured(Unconfigured::NoInputPath);
        }

        let mapping = &self.input_mapping;
        self.run_mapping("input", |ctx| mapping.map_input(ctx, domain))
    }

    /// Produce the domain-level result from the tool's output
    ///
    /// Requires an output path; otherwise logs one warning and returns
    /// `Outcome::NotConfigured(Unconfigured::NoOutputPath)`.
    pub fn map_output(&self, domain: &D) -> Outcome<O> {
        if !self.spec.has_output_path() {
            warn!(adapter_id = %self.id, "Output mapping skipped: no output path configured");
            return Outcome::NotConfigured(Unconfigured::NoOutputPath);
        }

        let mapping = &self.output_mapping;
        self.run_mapping("output", |ctx| mapping.map_output(ctx, domain))
    }

    /// Run `command`, or the memoized command line when `None`
    ///
    /// The exit status is captured, not judged: a failing tool still yields
    /// `Outcome::Success`. Nothing is spawned when there is no executable.
    pub async fn run_command(&self, command: Option<&CommandLine>) -> Outcome<RunOutput> {
        let command = match command {
            Some(command) => command.clone(),
            None => match self.last_command() {
                Ok(command) => command.clone(),
                Err(missing) => {
                    warn!(adapter_id = %self.id, reason = %missing, "Nothing to run");
                    return Outcome::NotConfigured(missing);
                }
            },
        };

        let request = self.scope.scoped(|working_dir| RunRequest {
            command,
            working_dir: working_dir.map(Path::to_path_buf),
        });

        info!(
            adapter_id = %self.id,
            command = %request.command,
            working_dir = ?request.working_dir,
            "Launching external tool"
        );

        match self.runner.run(&request).await {
            Ok(output) => {
                info!(
                    adapter_id = %self.id,
                    status = %output.status,
                    duration_ms = %output.duration_ms,
                    "External tool finished"
                );
                Outcome::Success(output)
            }
            Err(e) => {
                warn!(adapter_id = %self.id, error = %e, "External tool could not be run");
                Outcome::Failed(AdapterError::Run(e))
            }
        }
    }

    fn context<'a>(&'a self, working_dir: Option<&'a Path>) -> MappingContext<'a> {
        MappingContext::new(
            &self.id,
            self.spec.input_path.as_deref(),
            self.spec.output_path.as_deref(),
            working_dir,
            &self.params,
        )
    }

    /// Invoke a mapping inside the scratch scope with panic isolation
    fn run_mapping<T>(
        &self,
        direction: &'static str,
        op: impl FnOnce(&MappingContext<'_>) -> std::result::Result<T, MappingError>,
    ) -> Outcome<T> {
        debug!(adapter_id = %self.id, direction, "Running mapping");

        let guarded = self.scope.scoped(|working_dir| {
            let ctx = self.context(working_dir);
            catch_mapping_panic(&self.id, direction, AssertUnwindSafe(|| op(&ctx)))
        });

        match guarded {
            Ok(Ok(value)) => Outcome::Success(value),
            Ok(Err(e)) => {
                warn!(adapter_id = %self.id, direction, error = %e, "Mapping failed");
                Outcome::Failed(AdapterError::Mapping(e))
            }
            Err(msg) => Outcome::Failed(AdapterError::MappingPanicked(msg)),
        }
    }
}

impl<D: ?Sized, I, O> std::fmt::Debug for ToolAdapter<D, I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolAdapter")
            .field("id", &self.id)
            .field("spec", &self.spec)
            .field("scope", &self.scope)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Builder validating an adapter's configuration up front
pub struct ToolAdapterBuilder<D: ?Sized, I, O> {
    spec: ToolSpec,
    scratch: Option<ScratchDir>,
    params: serde_json::Value,
    input_mapping: Option<Arc<dyn InputMapping<D, I>>>,
    output_mapping: Option<Arc<dyn OutputMapping<D, O>>>,
    factory: Option<Box<dyn MappingFactory<D, I, O>>>,
    runner: Option<Arc<dyn ProcessRunner>>,
    path_resolver: Arc<dyn PathResolver>,
    id_provider: Arc<dyn IdProvider>,
}

impl<D: ?Sized, I, O> Default for ToolAdapterBuilder<D, I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ?Sized, I, O> ToolAdapterBuilder<D, I, O> {
    pub fn new() -> Self {
        Self {
            spec: ToolSpec::default(),
            scratch: None,
            params: serde_json::Value::Null,
            input_mapping: None,
            output_mapping: None,
            factory: None,
            runner: None,
            path_resolver: Arc::new(StdPathResolver),
            id_provider: Arc::new(UuidProvider),
        }
    }

    /// Apply a loaded configuration (replaces spec, scratch and params)
    pub fn config(mut self, config: &AdapterConfig) -> Self {
        self.spec = config.tool_spec();
        self.scratch = config.scratch();
        self.params = config.params.clone();
        self
    }

    pub fn executable(mut self, executable: impl Into<String>) -> Self {
        self.spec.executable = Some(executable.into());
        self
    }

    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.spec.input_path = Some(path.into());
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.spec.output_path = Some(path.into());
        self
    }

    pub fn trailing_options(mut self, options: impl Into<String>) -> Self {
        self.spec.trailing_options = Some(options.into());
        self
    }

    pub fn path_style(mut self, style: PathStyle) -> Self {
        self.spec.path_style = style;
        self
    }

    pub fn scratch_dir(mut self, scratch: ScratchDir) -> Self {
        self.scratch = Some(scratch);
        self
    }

    pub fn params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }

    pub fn input_mapping(mut self, mapping: impl InputMapping<D, I> + 'static) -> Self {
        self.input_mapping = Some(Arc::new(mapping));
        self
    }

    /// Closure form of [`Self::input_mapping`]
    pub fn input_fn<F>(self, f: F) -> Self
    where
        F: Fn(&MappingContext<'_>, &D) -> std::result::Result<I, MappingError>
            + Send
            + Sync
            + 'static,
    {
        self.input_mapping(f)
    }

    pub fn output_mapping(mut self, mapping: impl OutputMapping<D, O> + 'static) -> Self {
        self.output_mapping = Some(Arc::new(mapping));
        self
    }

    /// Closure form of [`Self::output_mapping`]
    pub fn output_fn<F>(self, f: F) -> Self
    where
        F: Fn(&MappingContext<'_>, &D) -> std::result::Result<O, MappingError>
            + Send
            + Sync
            + 'static,
    {
        self.output_mapping(f)
    }

    /// Defaults for any mapping direction not set explicitly
    pub fn mapping_factory(mut self, factory: impl MappingFactory<D, I, O> + 'static) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    pub fn runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    pub fn path_resolver(mut self, resolver: Arc<dyn PathResolver>) -> Self {
        self.path_resolver = resolver;
        self
    }

    pub fn id_provider(mut self, provider: Arc<dyn IdProvider>) -> Self {
        self.id_provider = provider;
        self
    }

    /// Validate and construct the adapter
    ///
    /// # Errors
    /// - AdapterError::Config if a mapping direction has neither an explicit
    ///   strategy nor a factory, or no process runner was supplied
    /// - AdapterError::Io if the scratch directory cannot be prepared
    pub fn build(self) -> Result<ToolAdapter<D, I, O>> {
        let runner = self
            .runner
            .ok_or_else(|| AdapterError::Config("no process runner supplied".to_string()))?;

        let input_mapping = match self.input_mapping {
            Some(mapping) => mapping,
            None => self
                .factory
                .as_ref()
                .map(|factory| factory.input_mapping())
                .ok_or_else(|| {
                    AdapterError::Config(
                        "no input mapping supplied and no mapping factory available".to_string(),
                    )
                })?,
        };

        let output_mapping = match self.output_mapping {
            Some(mapping) => mapping,
            None => self
                .factory
                .as_ref()
                .map(|factory| factory.output_mapping())
                .ok_or_else(|| {
                    AdapterError::Config(
                        "no output mapping supplied and no mapping factory available".to_string(),
                    )
                })?,
        };

        let scope = ScratchScope::prepare(self.scratch)?;
        let id = self.id_provider.generate_id();

        debug!(
            adapter_id = %id,
            executable = ?self.spec.executable(),
            scratch_dir = ?scope.dir(),
            "Adapter configured"
        );

        Ok(ToolAdapter {
            id,
            spec: self.spec,
            scope,
            params: self.params,
            input_mapping,
            output_mapping,
            runner,
            path_resolver: self.path_resolver,
            last_command: OnceLock::new(),
        })
    }
}
