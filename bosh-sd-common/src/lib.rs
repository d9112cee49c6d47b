//! Shared BOSH inventory types
//!
//! These structures describe what the director reports for one collection
//! cycle. They are rebuilt every cycle and never persisted.

use serde::{Deserialize, Serialize};

/// A named deployment and the instances it currently runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentInfo {
    pub name: String,
    #[serde(default)]
    pub instances: Vec<Instance>,
}

/// One running unit of a deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    #[serde(default)]
    pub az: String,
    #[serde(default)]
    pub ips: Vec<String>,
    #[serde(default)]
    pub processes: Vec<Process>,
}

/// A job process running inside an instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub name: String,
}

/// Director task states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Queued,
    Processing,
    Done,
    Error,
    Cancelled,
}

/// A unit of work in the director's task queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub state: TaskState,
    #[serde(default)]
    pub deployment: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl Instance {
    pub fn new(name: impl Into<String>, az: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            az: az.into(),
            ..Default::default()
        }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ips.push(ip.into());
        self
    }

    pub fn with_process(mut self, name: impl Into<String>) -> Self {
        self.processes.push(Process { name: name.into() });
        self
    }
}

impl DeploymentInfo {
    pub fn new(name: impl Into<String>, instances: Vec<Instance>) -> Self {
        Self {
            name: name.into(),
            instances,
        }
    }
}
