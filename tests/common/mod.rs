#![allow(dead_code)]

use async_trait::async_trait;
use modsync::config::ActivationConfig;
use modsync::db::{self, DbActorHandle, DbModuleState, ModuleStateCreate};
use modsync::dependencies::{DependencyInstaller, PackageManager};
use modsync::descriptor::DescriptorStore;
use modsync::error::PackageError;
use modsync::events::{EventSink, ModuleEvent};
use modsync::prompt::Confirm;
use modsync::service::{ModuleContext, ModuleService};
use modsync_schema::DependencySpec;
use serde_json::Value;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageCall {
    Install(String),
    Remove(String),
}

/// Records every call; packages listed in `failing` fail both install and remove.
#[derive(Default)]
pub struct RecordingPackageManager {
    calls: Mutex<Vec<PackageCall>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingPackageManager {
    pub fn calls(&self) -> Vec<PackageCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn removals(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PackageCall::Remove(p) => Some(p),
                PackageCall::Install(_) => None,
            })
            .collect()
    }

    pub fn installs(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PackageCall::Install(spec) => Some(spec),
                PackageCall::Remove(_) => None,
            })
            .collect()
    }

    pub fn fail_on(&self, package: &str) {
        self.failing.lock().unwrap().insert(package.to_string());
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn outcome(&self, package: &str) -> Result<(), PackageError> {
        if self.failing.lock().unwrap().contains(package) {
            return Err(PackageError::Exit {
                command: format!("fake {package}"),
                status: "exit status: 1".to_string(),
                output: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PackageManager for RecordingPackageManager {
    async fn install_package(&self, spec: &DependencySpec) -> Result<(), PackageError> {
        self.calls
            .lock()
            .unwrap()
            .push(PackageCall::Install(spec.to_string()));
        self.outcome(&spec.package)
    }

    async fn remove_package(&self, package: &str) -> Result<(), PackageError> {
        self.calls
            .lock()
            .unwrap()
            .push(PackageCall::Remove(package.to_string()));
        self.outcome(package)
    }
}

#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<ModuleEvent>>,
}

impl RecordingEventSink {
    pub fn events(&self) -> Vec<ModuleEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl EventSink for RecordingEventSink {
    fn dispatch(&self, event: ModuleEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Pops scripted answers in order; once they run out every question takes its default.
#[derive(Default)]
pub struct ScriptedConfirm {
    answers: Mutex<VecDeque<bool>>,
    questions: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn answer(&self, answers: &[bool]) {
        self.answers.lock().unwrap().extend(answers.iter().copied());
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl Confirm for ScriptedConfirm {
    async fn confirm(&self, question: &str, default: bool) -> bool {
        self.questions.lock().unwrap().push(question.to_string());
        self.answers.lock().unwrap().pop_front().unwrap_or(default)
    }
}

pub struct Harness {
    pub dir: TempDir,
    pub service: ModuleService,
    pub states: DbActorHandle,
    pub packages: Arc<RecordingPackageManager>,
    pub events: Arc<RecordingEventSink>,
    pub confirm: Arc<ScriptedConfirm>,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_depth(1).await
    }

    pub async fn with_depth(max_depth: usize) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let database_url = format!("sqlite:{}", dir.path().join("modules.db").display());
        let states = db::spawn(&database_url).await.unwrap();

        let descriptors = DescriptorStore::new(
            vec![dir.path().join("Modules"), dir.path().join("vendor/rcv")],
            "module.json",
        );
        let packages = Arc::new(RecordingPackageManager::default());
        let events = Arc::new(RecordingEventSink::default());
        let confirm = Arc::new(ScriptedConfirm::default());

        let manager: Arc<dyn PackageManager> = packages.clone();
        let installer = DependencyInstaller::new(descriptors.clone(), states.clone(), manager);
        let service = ModuleService::new(ModuleContext {
            descriptors,
            states: states.clone(),
            installer,
            events: events.clone(),
            confirm: confirm.clone(),
            activation: ActivationConfig { max_depth },
        });

        Self {
            dir,
            service,
            states,
            packages,
            events,
            confirm,
        }
    }

    fn descriptor_path(&self, module: &str) -> PathBuf {
        self.dir.path().join("Modules").join(module).join("module.json")
    }

    pub fn write_module(&self, module: &str, descriptor: Value) {
        write_json(&self.descriptor_path(module), &descriptor);
    }

    pub fn read_descriptor(&self, module: &str) -> Value {
        let raw = std::fs::read_to_string(self.descriptor_path(module)).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    pub async fn seed_state(&self, module: &str, enabled: bool) {
        self.states
            .create(ModuleStateCreate {
                name: module.to_string(),
                version: "1.0.0".to_string(),
                description: format!("{module} module for the application"),
                enabled,
            })
            .await
            .unwrap();
    }

    pub async fn state(&self, module: &str) -> Option<DbModuleState> {
        self.states.get(module).await.unwrap()
    }

    pub fn names(modules: &[&str]) -> Vec<String> {
        modules.iter().map(ToString::to_string).collect()
    }
}

fn write_json(path: &Path, value: &Value) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}
