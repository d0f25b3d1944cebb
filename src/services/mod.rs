pub mod confidence;
pub mod histogram;
pub mod percentiles;
pub mod pert_sampler;
pub mod project_yaml;
pub mod simulation;
pub mod simulation_types;
pub mod task_sheet;
