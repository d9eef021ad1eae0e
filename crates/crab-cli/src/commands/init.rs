//! Implementation of the `crab init` command.
//!
//! Responsibility: translate CLI arguments into an [`InitPlan`], wire the
//! adapters into the core [`InitService`], and display results. No business
//! logic lives here.

use std::io::IsTerminal;
use std::path::PathBuf;

use chrono::Datelike;
use tracing::{info, instrument};

use crab_adapters::{LocalFilesystem, LocalTemplateStore, ProcessRunner, TeraRenderer};
use crab_core::{
    application::{CommandRunner, InitReport, InitRequest, InitService, InitSteps},
    config::CrabConfig,
    domain::{ProjectName, RenderContext},
};

use crate::{
    cli::{GlobalArgs, InitArgs},
    config::{AppConfig, DEFAULT_AUTHOR},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Everything `crab init` needs, resolved from flags, settings and the
/// project configuration.
#[derive(Debug, Clone)]
pub struct InitPlan {
    pub name: ProjectName,
    pub template: String,
    pub author: String,
    pub steps: InitSteps,
    /// Directory the project directory is created in.
    pub parent_dir: PathBuf,
    pub templates_dir: Option<PathBuf>,
    pub config: CrabConfig,
}

impl InitPlan {
    pub fn project_dir(&self) -> PathBuf {
        self.parent_dir.join(self.name.as_str())
    }
}

/// Execute the `crab init` command.
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: InitArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // Nothing may touch the disk before the name is known to be safe.
    let name = ProjectName::parse(args.name.as_str()).map_err(|e| CliError::Core(e.into()))?;

    let cwd = std::env::current_dir().with_cli_context(|| "Failed to determine current directory")?;
    let project_config = super::load_project_config(global.config.as_deref(), &cwd)?;
    let author = resolve_author(&args, &config)?;

    let plan = InitPlan {
        name,
        template: args
            .template
            .clone()
            .unwrap_or_else(|| project_config.template.clone()),
        author,
        steps: InitSteps {
            venv: args.venv,
            git: args.git(),
            install: args.install_dependencies(),
        },
        parent_dir: cwd,
        templates_dir: global.templates_dir.clone().or(config.templates_dir.clone()),
        config: project_config,
    };

    let report = run_init(&plan, Box::new(ProcessRunner::new()), &output)?;
    print_summary(&plan, &report, &output)?;
    Ok(())
}

/// Render the project and run the requested steps through `runner`.
pub fn run_init(
    plan: &InitPlan,
    runner: Box<dyn CommandRunner>,
    output: &OutputManager,
) -> CliResult<InitReport> {
    let store = LocalTemplateStore::discover(plan.templates_dir.as_deref());
    let renderer = TeraRenderer::new(Box::new(store), &plan.template)?;
    let service = InitService::new(Box::new(renderer), runner, Box::new(LocalFilesystem::new()));

    let project_dir = plan.project_dir();
    info!(template = %plan.template, path = %project_dir.display(), "init started");

    let spinner = output.spinner(&format!("Creating '{}'...", plan.name));
    let result = service.run(&InitRequest {
        project_dir,
        context: render_context(plan),
        steps: plan.steps,
        config: &plan.config,
    });
    spinner.finish_and_clear();

    Ok(result?)
}

/// Variables available to every template.
///
/// The `paths` roles are exposed as variables only. Directory names inside a
/// set are fixed by the set itself, so a set that lays out `src/` keeps
/// `src/` whatever `paths.source` says.
pub fn render_context(plan: &InitPlan) -> RenderContext {
    RenderContext::for_project(plan.name.as_str())
        .with_variable("author", plan.author.as_str())
        .with_variable("year", chrono::Local::now().year().to_string())
        .with_variable("template", plan.template.as_str())
        .with_variable("package_name", plan.name.package_name())
        .with_variable("python_source_dir", plan.config.paths.source.as_str())
        .with_variable("tests_dir", plan.config.paths.tests.as_str())
        .with_variable("docs_dir", plan.config.paths.docs.as_str())
        .with_variable("venv_directory", plan.config.venv_directory.as_str())
        .with_variable("dev_packages", plan.config.all_group_packages().join(" "))
}

/// `--author`, else a prompt on a terminal, else the settings, else
/// [`DEFAULT_AUTHOR`].
fn resolve_author(args: &InitArgs, config: &AppConfig) -> CliResult<String> {
    if let Some(author) = args.author.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        return Ok(author.to_string());
    }

    let fallback = config.author().unwrap_or(DEFAULT_AUTHOR);
    if !args.yes && std::io::stdin().is_terminal() {
        return prompt_author(fallback);
    }
    Ok(fallback.to_string())
}

#[cfg(feature = "interactive")]
fn prompt_author(default: &str) -> CliResult<String> {
    use dialoguer::{Input, theme::ColorfulTheme};

    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("Author")
        .default(default.to_string())
        .interact_text()
        .map_err(|e| prompt_error(e.into()))
}

/// Ctrl-C at a prompt cancels the command.
#[cfg(feature = "interactive")]
fn prompt_error(err: std::io::Error) -> CliError {
    match err.kind() {
        std::io::ErrorKind::Interrupted => CliError::Cancelled,
        _ => CliError::IoError {
            message: "Failed to read author".into(),
            source: err,
        },
    }
}

#[cfg(not(feature = "interactive"))]
fn prompt_author(default: &str) -> CliResult<String> {
    Ok(default.to_string())
}

fn print_summary(plan: &InitPlan, report: &InitReport, output: &OutputManager) -> CliResult<()> {
    output.success(&format!(
        "Project initialized at {}!",
        report.project_dir.display()
    ))?;

    if let Some(venv) = &report.venv_dir {
        output.info(&format!("Environment created at {}", venv.display()))?;
    }
    if report.git_initialized {
        output.info("Git repository initialized")?;
    }
    if report.dependencies_installed {
        output.info("Dependencies installed")?;
    }

    if output.is_verbose() {
        for file in &report.files {
            output.print(&format!("  {}", file.display()))?;
        }
    }

    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", plan.name))?;
    if report.venv_dir.is_none() {
        output.print(&format!("  uv venv {}", plan.config.venv_directory))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crab_adapters::BUNDLED_TEMPLATES_DIR;
    use crab_core::{domain::Invocation, error::CrabResult};
    use std::fs;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Stands in for `uv` and `git`: records invocations and leaves the
    /// same marker files the real tools would.
    #[derive(Clone, Default)]
    struct FakeRunner {
        calls: Arc<Mutex<Vec<Invocation>>>,
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, invocation: &Invocation) -> CrabResult<()> {
            let args = invocation.arguments();
            match (invocation.program(), args.first().map(String::as_str)) {
                ("uv", Some("venv")) => {
                    let venv = Path::new(&args[1]);
                    fs::create_dir_all(venv).unwrap();
                    fs::write(venv.join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();
                }
                ("git", Some("init")) => {
                    let cwd = invocation.cwd().unwrap();
                    fs::create_dir_all(cwd.join(".git")).unwrap();
                }
                _ => {}
            }
            self.calls.lock().unwrap().push(invocation.clone());
            Ok(())
        }
    }

    fn plan(dir: &TempDir, steps: InitSteps) -> InitPlan {
        InitPlan {
            name: ProjectName::parse("test-project").unwrap(),
            template: "basic".into(),
            author: "Test Author".into(),
            steps,
            parent_dir: dir.path().to_path_buf(),
            templates_dir: Some(PathBuf::from(BUNDLED_TEMPLATES_DIR)),
            config: CrabConfig::default(),
        }
    }

    fn quiet_output() -> OutputManager {
        let args = GlobalArgs {
            quiet: true,
            no_color: true,
            ..GlobalArgs::default()
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn basic_template_layout() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner::default();

        run_init(&plan(&dir, InitSteps::default()), Box::new(runner.clone()), &quiet_output()).unwrap();

        let project = dir.path().join("test-project");
        assert!(project.join("pyproject.toml").is_file());
        assert!(project.join("README.md").is_file());
        assert!(project.join("src").is_dir());
        assert!(project.join("src/test-project/__init__.py").is_file());
        assert!(project.join("tests").is_dir());
        assert!(project.join("docs").is_dir());
        assert!(runner.calls.lock().unwrap().is_empty());

        let pyproject = fs::read_to_string(project.join("pyproject.toml")).unwrap();
        assert!(pyproject.contains("name = \"test-project\""));
        assert!(pyproject.contains("Test Author"));
        assert!(!project.join("pyproject.toml.j2").exists());
    }

    #[test]
    fn venv_step_creates_environment() {
        let dir = TempDir::new().unwrap();
        let steps = InitSteps {
            venv: true,
            ..InitSteps::default()
        };

        let report = run_init(&plan(&dir, steps), Box::new(FakeRunner::default()), &quiet_output()).unwrap();

        let venv = dir.path().join("test-project/.venv");
        assert!(venv.join("pyvenv.cfg").is_file());
        assert_eq!(report.venv_dir, Some(venv));
    }

    #[test]
    fn git_step_runs_in_project_directory() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner::default();
        let steps = InitSteps {
            git: true,
            ..InitSteps::default()
        };

        run_init(&plan(&dir, steps), Box::new(runner.clone()), &quiet_output()).unwrap();

        assert!(dir.path().join("test-project/.git").is_dir());
        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].cwd(), Some(dir.path().join("test-project").as_path()));
    }

    #[test]
    fn no_optional_steps_leave_no_environment_or_repository() {
        let dir = TempDir::new().unwrap();
        run_init(&plan(&dir, InitSteps::default()), Box::new(FakeRunner::default()), &quiet_output()).unwrap();

        let project = dir.path().join("test-project");
        assert!(project.join("pyproject.toml").exists());
        assert!(!project.join(".venv").exists());
        assert!(!project.join(".git").exists());
    }

    #[test]
    fn install_uses_environment_and_groups() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner::default();
        let steps = InitSteps {
            venv: true,
            git: false,
            install: true,
        };

        run_init(&plan(&dir, steps), Box::new(runner.clone()), &quiet_output()).unwrap();

        let calls = runner.calls.lock().unwrap();
        let install = calls.last().unwrap();
        assert_eq!(install.program(), "uv");
        assert!(install.arguments().starts_with(&["pip".to_string(), "install".to_string()]));
        assert!(install.arguments().contains(&"pytest".to_string()));
        assert!(install.arguments().contains(&"ruff".to_string()));
    }

    #[test]
    fn install_without_environment_fails() {
        let dir = TempDir::new().unwrap();
        let steps = InitSteps {
            install: true,
            ..InitSteps::default()
        };

        let err = run_init(&plan(&dir, steps), Box::new(FakeRunner::default()), &quiet_output()).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("No environment"));
    }

    #[test]
    fn existing_files_are_preserved() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("test-project");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("existing_file.txt"), "").unwrap();

        run_init(&plan(&dir, InitSteps::default()), Box::new(FakeRunner::default()), &quiet_output()).unwrap();

        assert!(project.join("existing_file.txt").exists());
        assert!(project.join("pyproject.toml").exists());
    }

    #[test]
    fn unknown_template_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut plan = plan(&dir, InitSteps::default());
        plan.template = "nonexistent".into();

        let err = run_init(&plan, Box::new(FakeRunner::default()), &quiet_output()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(!dir.path().join("test-project").exists());
    }

    #[test]
    fn configured_paths_do_not_desync_basic_layout() {
        let dir = TempDir::new().unwrap();
        let mut plan = plan(&dir, InitSteps::default());
        plan.config.paths.source = "lib".into();
        plan.config.paths.tests = "spec".into();

        run_init(&plan, Box::new(FakeRunner::default()), &quiet_output()).unwrap();

        let project = dir.path().join("test-project");
        assert!(project.join("src/test-project/__init__.py").is_file());
        assert!(project.join("tests").is_dir());
        assert!(!project.join("lib").exists());
        assert!(!project.join("spec").exists());

        let pyproject = fs::read_to_string(project.join("pyproject.toml")).unwrap();
        assert!(pyproject.contains("packages = [\"src/test-project\"]"));
        assert!(pyproject.contains("testpaths = [\"tests\"]"));
        assert!(!pyproject.contains("lib"));
        assert!(!pyproject.contains("spec"));

        let layout_test = fs::read_to_string(project.join("tests/test_layout.py")).unwrap();
        assert!(layout_test.contains("\"src\" / \"test-project\""));
    }

    #[test]
    fn package_directory_maps_to_importable_name() {
        let dir = TempDir::new().unwrap();
        run_init(&plan(&dir, InitSteps::default()), Box::new(FakeRunner::default()), &quiet_output()).unwrap();

        let project = dir.path().join("test-project");
        let pyproject = fs::read_to_string(project.join("pyproject.toml")).unwrap();
        assert!(pyproject.contains("\"src/test-project\" = \"test_project\""));
        let readme = fs::read_to_string(project.join("README.md")).unwrap();
        assert!(readme.contains("`test_project`"));
    }

    #[test]
    fn readme_follows_configured_environment_and_groups() {
        let dir = TempDir::new().unwrap();
        let mut plan = plan(&dir, InitSteps::default());
        plan.config.venv_directory = "env".into();
        plan.config.dependencies.groups[0].packages = vec!["pytest".into(), "black".into()];

        run_init(&plan, Box::new(FakeRunner::default()), &quiet_output()).unwrap();

        let project = dir.path().join("test-project");
        let readme = fs::read_to_string(project.join("README.md")).unwrap();
        assert!(readme.contains("uv venv env\n"));
        assert!(readme.contains("--python env -e . pytest black\n"));
        assert!(readme.contains("env/bin/pytest tests"));
        assert!(!readme.contains(".venv"));
        assert!(!readme.contains("ruff"));

        let pyproject = fs::read_to_string(project.join("pyproject.toml")).unwrap();
        assert!(pyproject.contains("venv_directory = \"env\""));
    }

    #[test]
    fn context_carries_paths_and_package_name() {
        let dir = TempDir::new().unwrap();
        let ctx = render_context(&plan(&dir, InitSteps::default()));
        assert_eq!(ctx.get("package_name"), Some("test_project"));
        assert_eq!(ctx.get("python_source_dir"), Some("src"));
        assert_eq!(ctx.get("tests_dir"), Some("tests"));
        assert_eq!(ctx.get("docs_dir"), Some("docs"));
        assert_eq!(ctx.get("year").map(str::len), Some(4));
        assert_eq!(ctx.get("venv_directory"), Some(".venv"));
        assert_eq!(ctx.get("dev_packages"), Some("pytest ruff"));
    }

    #[cfg(feature = "interactive")]
    #[test]
    fn interrupted_prompt_cancels() {
        use std::io::{Error, ErrorKind};

        let err = prompt_error(Error::new(ErrorKind::Interrupted, "ctrl-c"));
        assert!(matches!(err, CliError::Cancelled));
        assert_eq!(err.exit_code(), 1);

        let err = prompt_error(Error::new(ErrorKind::BrokenPipe, "closed"));
        assert!(matches!(err, CliError::IoError { .. }));
    }

    #[test]
    fn explicit_author_wins() {
        let args = InitArgs {
            name: "demo".into(),
            template: None,
            venv: false,
            setup_git: false,
            no_setup_git: false,
            install: false,
            no_install: false,
            author: Some("  Ada  ".into()),
            yes: true,
        };
        assert_eq!(resolve_author(&args, &AppConfig::default()).unwrap(), "Ada");

        let args = InitArgs { author: None, ..args };
        let config = AppConfig {
            author: Some("Grace".into()),
            ..AppConfig::default()
        };
        assert_eq!(resolve_author(&args, &config).unwrap(), "Grace");
        assert_eq!(resolve_author(&args, &AppConfig::default()).unwrap(), DEFAULT_AUTHOR);
    }
}
