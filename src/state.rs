use crate::services::diet_plan::DietPlanService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub diet_plans: Arc<DietPlanService>,
}

pub type SharedState = Arc<AppState>;
