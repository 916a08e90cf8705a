pub mod orchestration;

pub use orchestration::{
    load_plan_workspace, plan_workspace, run_plan_workflow, PlanWorkflowArgs,
};
