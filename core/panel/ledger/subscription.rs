


use std::sync::Arc;
use chrono::{DateTime, Utc};
use log::info;
use crate::error::PanelError;
use crate::misc::format_amount;
use crate::models::active_plans::{ActivePlan, ActivePlanData};
use crate::models::plans::Plan;
use crate::models::users::User;
use crate::storage::Store;


pub struct SubscriptionManager{
    store: Arc<dyn Store>,
}

impl SubscriptionManager{

    pub fn new(store: Arc<dyn Store>) -> Self{
        Self{ store }
    }

    pub fn subscribe(&self, user: &User, plan: &Plan, now: DateTime<Utc>) -> Result<ActivePlan, PanelError>{

        /* the store checks the balance again inside the debit, this one saves a roundtrip */
        if user.balance < plan.stake{
            return Err(PanelError::InsufficientBalance);
        }

        let active_plan = self.store.open_subscription(user.id, plan, now)?;
        info!(
            "➔ 📈 user [{}] subscribed to {} with a stake of {}, active plan [{}] ends at {}",
            user.id, plan.name, format_amount(plan.stake), active_plan.id, active_plan.end_date
        );

        Ok(active_plan)
    }

    pub fn subscriptions_of(&self, user_id: i32, now: DateTime<Utc>) -> Result<Vec<ActivePlanData>, PanelError>{
        let subscriptions = self.store
            .get_user_active_plans(user_id)?
            .iter()
            .map(|(active_plan, plan)| active_plan.to_data(plan, now))
            .collect();
        Ok(subscriptions)
    }

}


#[cfg(test)]
mod tests{

    use chrono::Duration;
    use crate::ledger::fixtures::*;
    use super::*;

    #[test]
    fn low_balance_changes_nothing(){
        let store = seeded_store();
        let plan = basic_plan(&store);
        let user = user_with_balance(&store, "jane@profitbliss.com", 49_99);
        let manager = SubscriptionManager::new(store.clone());

        assert!(matches!(manager.subscribe(&user, &plan, t0()), Err(PanelError::InsufficientBalance)));
        assert_eq!(balance_of(&store, user.id), 49_99);
        assert!(manager.subscriptions_of(user.id, t0()).unwrap().is_empty());
    }

    #[test]
    fn stale_user_snapshot_is_caught_by_the_store(){
        let store = seeded_store();
        let plan = basic_plan(&store);
        let user = user_with_balance(&store, "jane@profitbliss.com", 50_00);
        store.set_balance(user.id, 10_00);

        let manager = SubscriptionManager::new(store.clone());
        assert!(matches!(manager.subscribe(&user, &plan, t0()), Err(PanelError::InsufficientBalance)));
        assert_eq!(balance_of(&store, user.id), 10_00);
    }

    #[test]
    fn one_subscription_per_call_and_exactly_the_stake(){
        let store = seeded_store();
        let plan = basic_plan(&store);
        let user = user_with_balance(&store, "jane@profitbliss.com", 120_00);
        let manager = SubscriptionManager::new(store.clone());

        let active_plan = manager.subscribe(&user, &plan, t0()).unwrap();
        assert_eq!(active_plan.start_date, t0());
        assert_eq!(active_plan.last_roi_date, Some(t0()));
        assert_eq!(balance_of(&store, user.id), 70_00);

        /* the same plan can be held more than once */
        let user = store.find_user_by_id(user.id).unwrap().unwrap();
        manager.subscribe(&user, &plan, t0()).unwrap();
        assert_eq!(balance_of(&store, user.id), 20_00);

        let later = t0() + Duration::days(31);
        let subscriptions = manager.subscriptions_of(user.id, later).unwrap();
        assert_eq!(subscriptions.len(), 2);
        assert!(subscriptions.iter().all(|s| !s.is_active));
        assert_eq!(subscriptions[0].plan.daily_return, "10.00");
    }

}
