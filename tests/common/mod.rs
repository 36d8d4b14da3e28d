// Shared helpers for integration tests.
//
// Provides an in-memory environment rooted at `/Working`, a fake file
// system, and a process runner that records what it was asked to start, so
// each test can drive `EazfuscatorRunner` without touching the real system.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use eazfuscator_runner::environment::Environment;
use eazfuscator_runner::exec::{ProcessHandle, ProcessRequest, ProcessRunner};
use eazfuscator_runner::locator::SystemToolLocator;
use eazfuscator_runner::operations::FileSystemOps;
use eazfuscator_runner::platform::{Os, Platform};
use eazfuscator_runner::{EazfuscatorRunner, ExitInfo, ObfuscatorSettings, RunnerError};

/// Working directory of every fixture.
pub const WORKING: &str = "/Working";

/// Where the fixture places the obfuscator unless told otherwise.
pub const DEFAULT_TOOL: &str = "/Working/tools/Eazfuscator.Net.exe";

/// Environment with a fixed working directory and no `PATH`.
#[derive(Debug, Default)]
pub struct FixtureEnvironment {
    pub vars: HashMap<String, String>,
}

impl Environment for FixtureEnvironment {
    fn working_directory(&self) -> PathBuf {
        PathBuf::from(WORKING)
    }

    fn variable(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// File system that knows only the files it was told about.
#[derive(Debug, Default)]
pub struct FakeFileSystem {
    pub files: BTreeSet<PathBuf>,
}

impl FileSystemOps for FakeFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        self.files.contains(path)
    }
}

/// How the fake process behaves once started.
#[derive(Debug, Clone, Copy)]
pub enum ProcessOutcome {
    Exit(i32),
    FailToStart,
    FailToWait,
}

struct FakeHandle(ProcessOutcome);

impl ProcessHandle for FakeHandle {
    fn wait_for_exit(&mut self) -> io::Result<i32> {
        match self.0 {
            ProcessOutcome::Exit(code) => Ok(code),
            _ => Err(io::Error::other("wait failed")),
        }
    }
}

/// Records every start request and replays a canned outcome.
#[derive(Debug)]
pub struct RecordingProcessRunner {
    pub outcome: ProcessOutcome,
    pub started: Mutex<Vec<ProcessRequest>>,
}

impl ProcessRunner for RecordingProcessRunner {
    fn start(&self, request: &ProcessRequest) -> io::Result<Box<dyn ProcessHandle>> {
        self.started.lock().unwrap().push(request.clone());
        match self.outcome {
            ProcessOutcome::FailToStart => Err(io::Error::from(io::ErrorKind::NotFound)),
            outcome => Ok(Box::new(FakeHandle(outcome))),
        }
    }
}

/// Arrange-act helper around [`EazfuscatorRunner`].
///
/// Defaults: one input file `input/test.dll`, default settings, the
/// obfuscator present at [`DEFAULT_TOOL`], and a process that exits with 0.
pub struct RunnerFixture {
    pub input_files: Option<Vec<PathBuf>>,
    pub settings: Option<ObfuscatorSettings>,
    pub files: BTreeSet<PathBuf>,
    pub search_dirs: Vec<PathBuf>,
    pub vars: HashMap<String, String>,
    pub platform: Platform,
    pub outcome: ProcessOutcome,
    process: Option<Arc<RecordingProcessRunner>>,
}

impl Default for RunnerFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl RunnerFixture {
    pub fn new() -> Self {
        Self {
            input_files: Some(vec![PathBuf::from("input/test.dll")]),
            settings: Some(ObfuscatorSettings::default()),
            files: BTreeSet::from([PathBuf::from(DEFAULT_TOOL)]),
            search_dirs: Vec::new(),
            vars: HashMap::new(),
            platform: Platform::new(Os::Linux),
            outcome: ProcessOutcome::Exit(0),
            process: None,
        }
    }

    pub fn settings_mut(&mut self) -> &mut ObfuscatorSettings {
        self.settings.get_or_insert_with(ObfuscatorSettings::default)
    }

    pub fn given_settings_null(&mut self) {
        self.settings = None;
    }

    pub fn given_input_files_null(&mut self) {
        self.input_files = None;
    }

    pub fn given_input_files(&mut self, files: &[&str]) {
        self.input_files = Some(files.iter().map(PathBuf::from).collect());
    }

    pub fn given_default_tool_missing(&mut self) {
        self.files.remove(Path::new(DEFAULT_TOOL));
    }

    pub fn given_file(&mut self, path: &str) {
        self.files.insert(PathBuf::from(path));
    }

    pub fn given_process_exit_code(&mut self, code: i32) {
        self.outcome = ProcessOutcome::Exit(code);
    }

    pub fn given_process_cannot_start(&mut self) {
        self.outcome = ProcessOutcome::FailToStart;
    }

    pub fn given_process_cannot_be_awaited(&mut self) {
        self.outcome = ProcessOutcome::FailToWait;
    }

    pub fn runner(&mut self) -> EazfuscatorRunner {
        let env = FixtureEnvironment {
            vars: self.vars.clone(),
        };
        let fs = FakeFileSystem {
            files: self.files.clone(),
        };
        let locator = SystemToolLocator::for_environment(
            &env,
            &self.platform,
            Arc::new(fs),
            &self.search_dirs,
        );
        let process = Arc::new(RecordingProcessRunner {
            outcome: self.outcome,
            started: Mutex::new(Vec::new()),
        });
        self.process = Some(Arc::clone(&process));
        EazfuscatorRunner::new(Arc::new(env), Arc::new(locator), process)
    }

    pub fn run(&mut self) -> Result<ExitInfo, RunnerError> {
        let runner = self.runner();
        runner.run(self.input_files.as_deref(), self.settings.as_ref())
    }

    /// The rendered argument string of a run that must succeed.
    pub fn args(&mut self) -> String {
        self.run().expect("run should succeed").args()
    }

    /// Requests passed to the process runner by the last `run`.
    pub fn started(&self) -> Vec<ProcessRequest> {
        self.process
            .as_ref()
            .map(|p| p.started.lock().unwrap().clone())
            .unwrap_or_default()
    }
}
