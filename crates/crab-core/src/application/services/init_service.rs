//! Init Service - main application orchestrator.
//!
//! This service coordinates the `crab init` workflow:
//! 1. Render the template set into the project directory
//! 2. Create the package environment (`uv venv`)
//! 3. Initialize version control (`git init`)
//! 4. Install declared dependencies (`uv pip install`)
//!
//! Steps 2-4 are optional. The first failure stops the sequence and nothing
//! that already happened is undone.

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{CommandRunner, Filesystem, RenderReport, TemplateRenderer},
    },
    config::CrabConfig,
    domain::{Invocation, RenderContext},
    error::CrabResult,
};

/// Program used for environments and installs.
pub const UV_PROGRAM: &str = "uv";

/// Program used for version control.
pub const GIT_PROGRAM: &str = "git";

/// Which optional steps to run after rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitSteps {
    pub venv: bool,
    pub git: bool,
    pub install: bool,
}

/// Input for one `init` run.
#[derive(Debug, Clone)]
pub struct InitRequest<'a> {
    pub project_dir: PathBuf,
    pub context: RenderContext,
    pub steps: InitSteps,
    pub config: &'a CrabConfig,
}

/// What an `init` run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub project_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub venv_dir: Option<PathBuf>,
    pub git_initialized: bool,
    pub dependencies_installed: bool,
}

/// Orchestrates rendering and the external tool steps.
pub struct InitService {
    renderer: Box<dyn TemplateRenderer>,
    runner: Box<dyn CommandRunner>,
    filesystem: Box<dyn Filesystem>,
}

impl InitService {
    pub fn new(
        renderer: Box<dyn TemplateRenderer>,
        runner: Box<dyn CommandRunner>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            renderer,
            runner,
            filesystem,
        }
    }

    /// Name of the template set this service renders.
    pub fn template_name(&self) -> &str {
        self.renderer.template_set().name()
    }

    /// Run every requested step in order.
    #[instrument(
        skip_all,
        fields(
            project_dir = %request.project_dir.display(),
            template = %self.template_name()
        )
    )]
    pub fn run(&self, request: &InitRequest<'_>) -> CrabResult<InitReport> {
        let project_dir = request.project_dir.as_path();

        let rendered = self.render(project_dir, &request.context)?;
        let mut report = InitReport {
            project_dir: project_dir.to_path_buf(),
            files: rendered.files,
            venv_dir: None,
            git_initialized: false,
            dependencies_installed: false,
        };

        if request.steps.venv {
            report.venv_dir =
                Some(self.create_environment(project_dir, &request.config.venv_directory)?);
        }

        if request.steps.git {
            self.init_repository(project_dir)?;
            report.git_initialized = true;
        }

        if request.steps.install {
            self.install_dependencies(project_dir, request.config)?;
            report.dependencies_installed = true;
        }

        info!(files = report.files.len(), "Project initialized");
        Ok(report)
    }

    /// Render the template set into `project_dir`.
    pub fn render(&self, project_dir: &Path, context: &RenderContext) -> CrabResult<RenderReport> {
        let report = self.renderer.render(project_dir, context)?;
        debug!(files = report.file_count(), "Template rendered");
        Ok(report)
    }

    /// Create `<project_dir>/<venv_directory>` with `uv venv`.
    #[instrument(skip(self), fields(project_dir = %project_dir.display()))]
    pub fn create_environment(&self, project_dir: &Path, venv_directory: &str) -> CrabResult<PathBuf> {
        let venv_dir = project_dir.join(venv_directory);
        if self.filesystem.exists(&venv_dir) {
            return Err(ApplicationError::EnvironmentExists { path: venv_dir }.into());
        }

        self.runner.run(&venv_invocation(project_dir, &venv_dir))?;
        info!(venv = %venv_dir.display(), "Environment created");
        Ok(venv_dir)
    }

    /// Run `git init` inside `project_dir`.
    #[instrument(skip(self), fields(project_dir = %project_dir.display()))]
    pub fn init_repository(&self, project_dir: &Path) -> CrabResult<()> {
        self.runner.run(&git_init_invocation(project_dir))?;
        info!("Repository initialized");
        Ok(())
    }

    /// Install the project and every dependency group into the environment.
    #[instrument(skip_all, fields(project_dir = %project_dir.display()))]
    pub fn install_dependencies(&self, project_dir: &Path, config: &CrabConfig) -> CrabResult<()> {
        let venv_dir = project_dir.join(&config.venv_directory);
        if !self.filesystem.exists(&venv_dir) {
            return Err(ApplicationError::MissingEnvironment { path: venv_dir }.into());
        }

        self.runner
            .run(&install_invocation(project_dir, &venv_dir, config))?;
        info!("Dependencies installed");
        Ok(())
    }
}

/// `uv venv <venv_dir>`
pub fn venv_invocation(project_dir: &Path, venv_dir: &Path) -> Invocation {
    Invocation::new(UV_PROGRAM)
        .arg("venv")
        .arg(venv_dir.to_string_lossy())
        .current_dir(project_dir)
}

/// `git init`
pub fn git_init_invocation(project_dir: &Path) -> Invocation {
    Invocation::new(GIT_PROGRAM)
        .arg("init")
        .current_dir(project_dir)
}

/// `uv pip install --python <venv> [--index-url ..] -e . <packages>`
///
/// The first source is the primary index; the rest are extra indexes.
pub fn install_invocation(project_dir: &Path, venv_dir: &Path, config: &CrabConfig) -> Invocation {
    let mut inv = Invocation::new(UV_PROGRAM)
        .args(["pip", "install", "--python"])
        .arg(venv_dir.to_string_lossy());

    let mut sources = config.dependencies.sources.iter();
    if let Some(primary) = sources.next() {
        inv = inv.arg("--index-url").arg(primary.as_str());
    }
    for extra in sources {
        inv = inv.arg("--extra-index-url").arg(extra.as_str());
    }

    inv.args(["-e", "."])
        .args(config.all_group_packages())
        .current_dir(project_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockCommandRunner;
    use crate::domain::{DomainError, RelativePath, TemplateSet};
    use crate::error::CrabError;
    use mockall::Sequence;
    use std::collections::BTreeSet;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct FakeFs(Arc<Mutex<BTreeSet<PathBuf>>>);

    impl FakeFs {
        fn touch(&self, path: &Path) {
            self.0.lock().unwrap().insert(path.to_path_buf());
        }
    }

    impl Filesystem for FakeFs {
        fn create_dir_all(&self, path: &Path) -> CrabResult<()> {
            self.touch(path);
            Ok(())
        }

        fn write_file(&self, path: &Path, _content: &str) -> CrabResult<()> {
            self.touch(path);
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.0.lock().unwrap().contains(path)
        }
    }

    struct FakeRenderer {
        set: TemplateSet,
        fail: bool,
    }

    impl FakeRenderer {
        fn new() -> Self {
            Self {
                set: TemplateSet::new(
                    "basic",
                    "/templates/basic",
                    vec![RelativePath::try_new("README.md.j2").unwrap()],
                ),
                fail: false,
            }
        }
    }

    impl TemplateRenderer for FakeRenderer {
        fn template_set(&self) -> &TemplateSet {
            &self.set
        }

        fn render(&self, target_dir: &Path, _context: &RenderContext) -> CrabResult<RenderReport> {
            if self.fail {
                return Err(DomainError::UndefinedVariable {
                    template: "README.md.j2".into(),
                    variable: "author".into(),
                }
                .into());
            }
            let mut report = RenderReport::new(target_dir);
            report.files.push(target_dir.join("README.md"));
            Ok(report)
        }
    }

    fn request(config: &CrabConfig, steps: InitSteps) -> InitRequest<'_> {
        InitRequest {
            project_dir: PathBuf::from("/work/demo"),
            context: RenderContext::for_project("demo"),
            steps,
            config,
        }
    }

    #[test]
    fn render_only_runs_no_commands() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let service = InitService::new(
            Box::new(FakeRenderer::new()),
            Box::new(runner),
            Box::new(FakeFs::default()),
        );
        let config = CrabConfig::default();
        let report = service.run(&request(&config, InitSteps::default())).unwrap();

        assert_eq!(report.files, vec![PathBuf::from("/work/demo/README.md")]);
        assert_eq!(report.venv_dir, None);
        assert!(!report.git_initialized);
        assert!(!report.dependencies_installed);
    }

    #[test]
    fn all_steps_run_in_order() {
        let fs = FakeFs::default();
        let venv_fs = fs.clone();
        let mut seq = Sequence::new();
        let mut runner = MockCommandRunner::new();

        runner
            .expect_run()
            .withf(|inv| inv.program() == "uv" && inv.arguments()[0] == "venv")
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| {
                venv_fs.touch(Path::new("/work/demo/.venv"));
                Ok(())
            });
        runner
            .expect_run()
            .withf(|inv| {
                inv.program() == "git"
                    && inv.arguments() == ["init"]
                    && inv.cwd() == Some(Path::new("/work/demo"))
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        runner
            .expect_run()
            .withf(|inv| inv.program() == "uv" && inv.arguments()[0] == "pip")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let service = InitService::new(Box::new(FakeRenderer::new()), Box::new(runner), Box::new(fs));
        let config = CrabConfig::default();
        let steps = InitSteps {
            venv: true,
            git: true,
            install: true,
        };
        let report = service.run(&request(&config, steps)).unwrap();

        assert_eq!(report.venv_dir, Some(PathBuf::from("/work/demo/.venv")));
        assert!(report.git_initialized);
        assert!(report.dependencies_installed);
    }

    #[test]
    fn existing_environment_is_rejected() {
        let fs = FakeFs::default();
        fs.touch(Path::new("/work/demo/.venv"));
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let service = InitService::new(Box::new(FakeRenderer::new()), Box::new(runner), Box::new(fs));
        let err = service
            .create_environment(Path::new("/work/demo"), ".venv")
            .unwrap_err();

        assert!(matches!(
            err,
            CrabError::Application(ApplicationError::EnvironmentExists { .. })
        ));
    }

    #[test]
    fn install_without_environment_fails() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let service = InitService::new(
            Box::new(FakeRenderer::new()),
            Box::new(runner),
            Box::new(FakeFs::default()),
        );
        let config = CrabConfig::default();
        let err = service
            .install_dependencies(Path::new("/work/demo"), &config)
            .unwrap_err();

        assert!(matches!(
            err,
            CrabError::Application(ApplicationError::MissingEnvironment { .. })
        ));
    }

    #[test]
    fn failing_step_stops_the_sequence() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|inv| inv.program() == "uv")
            .times(1)
            .returning(|inv| {
                Err(ApplicationError::ExternalToolFailed {
                    command: inv.to_string(),
                    status: Some(2),
                    stderr: "boom".into(),
                }
                .into())
            });
        runner.expect_run().withf(|inv| inv.program() == "git").never();

        let service = InitService::new(
            Box::new(FakeRenderer::new()),
            Box::new(runner),
            Box::new(FakeFs::default()),
        );
        let config = CrabConfig::default();
        let steps = InitSteps {
            venv: true,
            git: true,
            install: false,
        };
        let err = service.run(&request(&config, steps)).unwrap_err();

        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn render_failure_skips_commands() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let mut renderer = FakeRenderer::new();
        renderer.fail = true;
        let service = InitService::new(
            Box::new(renderer),
            Box::new(runner),
            Box::new(FakeFs::default()),
        );
        let config = CrabConfig::default();
        let steps = InitSteps {
            venv: true,
            git: true,
            install: true,
        };

        assert!(matches!(
            service.run(&request(&config, steps)),
            Err(CrabError::Domain(DomainError::UndefinedVariable { .. }))
        ));
    }

    #[test]
    fn install_invocation_uses_sources_and_groups() {
        let config = CrabConfig::from_document_str(
            r#"
[tool.crab.dependencies]
sources = ["https://pypi.org/simple", "https://mirror.example/simple"]
groups = [
    { name = "dev", packages = ["pytest", "ruff"] },
    { name = "docs", packages = ["mkdocs", "pytest"] },
]
"#,
        )
        .unwrap();

        let inv = install_invocation(
            Path::new("/work/demo"),
            Path::new("/work/demo/.venv"),
            &config,
        );

        assert_eq!(
            inv.arguments(),
            [
                "pip",
                "install",
                "--python",
                "/work/demo/.venv",
                "--index-url",
                "https://pypi.org/simple",
                "--extra-index-url",
                "https://mirror.example/simple",
                "-e",
                ".",
                "pytest",
                "ruff",
                "mkdocs",
            ]
        );
        assert_eq!(inv.cwd(), Some(Path::new("/work/demo")));
    }

    #[test]
    fn venv_invocation_targets_project_environment() {
        let inv = venv_invocation(Path::new("/work/demo"), Path::new("/work/demo/.venv"));
        assert_eq!(inv.to_string(), "uv venv /work/demo/.venv");
    }
}
