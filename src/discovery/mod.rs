pub mod collector;
pub mod groups;
pub mod target;

pub use collector::ServiceDiscoveryCollector;
pub use groups::{
    create_target_groups, LabelGroupKey, LabelGroups, SelectorFilters, TargetGroup,
    BOSH_DEPLOYMENT_NAME_LABEL, BOSH_JOB_PROCESS_NAME_LABEL,
};
pub use target::{ConfigMapTarget, FileTarget, PublishTarget};
