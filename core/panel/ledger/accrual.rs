


use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::{Serialize, Deserialize};
use crate::error::PanelError;
use crate::misc::format_amount;
use crate::models::active_plans::ActivePlan;
use crate::storage::{CreditOutcome, Store};


/* what a single sweep did */
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccrualReport{
    pub scanned: usize,
    pub credited: usize,
    pub already_credited: usize,
    pub orphaned: usize,
    pub failed: usize,
    pub total_credit: i64,
}

pub struct AccrualEngine{
    store: Arc<dyn Store>,
}

impl AccrualEngine{

    pub fn new(store: Arc<dyn Store>) -> Self{
        Self{ store }
    }

    /*
        a credit is due once the utc date of now is strictly after the
        date of the last credit, or of the start if nothing got credited
        yet; days missed in between are not paid back
    */
    pub fn is_roi_due(active_plan: &ActivePlan, now: DateTime<Utc>) -> bool{
        active_plan.is_active(now)
            && now.date_naive() > active_plan.roi_anchor().date_naive()
    }

    pub fn accrue_all(&self, now: DateTime<Utc>) -> Result<AccrualReport, PanelError>{

        let accruable = self.store.get_accruable(now)?;
        let mut report = AccrualReport{
            scanned: accruable.len(),
            ..AccrualReport::default()
        };

        for (active_plan, plan) in accruable{

            if !Self::is_roi_due(&active_plan, now){
                report.already_credited += 1;
                continue;
            }

            let credit = plan.daily_credit();
            match self.store.credit_roi(&active_plan, credit, now){
                Ok(CreditOutcome::Credited) => {
                    report.credited += 1;
                    report.total_credit = report.total_credit.saturating_add(credit);
                },
                /* a concurrent sweep got there first */
                Ok(CreditOutcome::AlreadyCredited) => report.already_credited += 1,
                Ok(CreditOutcome::OwnerMissing) => {
                    warn!("🥲 skipping active plan [{}], its owner [{}] doesn't exist", active_plan.id, active_plan.user_id);
                    report.orphaned += 1;
                },
                Err(e) => {
                    error!("😕 can't credit active plan [{}] - {}", active_plan.id, e);
                    report.failed += 1;
                },
            }
        }

        if report.credited > 0 || report.failed > 0 || report.orphaned > 0{
            info!(
                "➔ 💸 accrual sweep credited {} of {} active plans, total {} ({} orphaned, {} failed)",
                report.credited, report.scanned, format_amount(report.total_credit),
                report.orphaned, report.failed
            );
        } else{
            debug!("➔ accrual sweep found nothing due among {} active plans", report.scanned);
        }

        Ok(report)
    }

    /* runs a sweep on every tick in the blocking pool, the first tick fires right away */
    pub fn spawn_sweeper(store: Arc<dyn Store>, every: Duration) -> tokio::task::JoinHandle<()>{

        info!("➔ ⏰ background accrual sweeper runs every {}s", every.as_secs());
        tokio::spawn(async move{
            let mut interval = tokio::time::interval(every);
            loop{
                interval.tick().await;
                let engine = AccrualEngine::new(store.clone());
                match tokio::task::spawn_blocking(move || engine.accrue_all(Utc::now())).await{
                    Ok(Ok(_)) => {},
                    Ok(Err(e)) => error!("😕 background accrual sweep failed - {}", e),
                    Err(e) => error!("😕 background accrual sweep panicked - {}", e),
                }
            }
        })
    }

}
