


use std::sync::Arc;
use log::info;
use crate::error::PanelError;
use crate::models::plans::{NewPlan, Plan};
use crate::storage::Store;


pub struct PlanCatalog{
    store: Arc<dyn Store>,
}

impl PlanCatalog{

    pub fn new(store: Arc<dyn Store>) -> Self{
        Self{ store }
    }

    /* name, stake in cents, daily roi percentage, duration in days */
    pub fn default_tiers() -> Vec<NewPlan>{
        [
            ("Basic", 50_00, 20, 30),
            ("Gold", 100_00, 35, 30),
            ("Master", 200_00, 50, 30),
            ("Premium", 300_00, 75, 30),
        ]
        .into_iter()
        .map(|(name, stake, daily_roi, duration)| NewPlan{
            name: name.to_string(),
            stake,
            daily_roi,
            duration,
        })
        .collect()
    }

    /* returns how many tiers got inserted, zero on an already seeded catalog */
    pub fn ensure_seeded(&self) -> Result<usize, PanelError>{
        let inserted = self.store.seed_plans(&Self::default_tiers())?;
        if inserted > 0{
            info!("➔ 🌱 plan catalog seeded with {} tiers", inserted);
        }
        Ok(inserted)
    }

    pub fn list_plans(&self) -> Result<Vec<Plan>, PanelError>{
        self.store.get_plans()
    }

    pub fn find_plan(&self, plan_id: i32) -> Result<Plan, PanelError>{
        self.store
            .find_plan(plan_id)?
            .ok_or(PanelError::NotFound("Plan"))
    }

}
