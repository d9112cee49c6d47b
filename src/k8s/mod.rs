pub mod client;

pub use client::{ConfigMapStore, K8sClient};
