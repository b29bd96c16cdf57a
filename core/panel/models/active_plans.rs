

use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use serde::{Serialize, Deserialize};
use crate::schema::active_plans;
use super::plans::{Plan, PlanData};


/*

    diesel migration generate active_plans ---> create active_plans migration sql files
    diesel migration run                   ---> apply sql files to db
    diesel migration redo                  ---> drop tables

*/

#[derive(Identifiable, Selectable, Queryable, Clone, Debug, PartialEq)]
#[diesel(table_name=active_plans)]
pub struct ActivePlan{
    pub id: i32,
    pub user_id: i32,
    pub plan_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub last_roi_date: Option<DateTime<Utc>>,
}

#[derive(Insertable, Clone, Debug, PartialEq)]
#[diesel(table_name=active_plans)]
pub struct NewActivePlan{
    pub user_id: i32,
    pub plan_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub last_roi_date: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ActivePlanData{
    pub id: i32,
    pub plan: PlanData,
    pub start_date: String,
    pub end_date: String,
    pub last_roi_date: Option<String>,
    pub is_active: bool,
}

impl NewActivePlan{

    pub fn starting(user_id: i32, plan: &Plan, now: DateTime<Utc>) -> Self{
        NewActivePlan{
            user_id,
            plan_id: plan.id,
            start_date: now,
            end_date: now + Duration::days(i64::from(plan.duration)),
            last_roi_date: Some(now),
        }
    }

}

impl ActivePlan{

    /* an active plan stops accruing once now passes its end date, it's never deleted */
    pub fn is_active(&self, now: DateTime<Utc>) -> bool{
        now <= self.end_date
    }

    /* the instant the next credit is measured from */
    pub fn roi_anchor(&self) -> DateTime<Utc>{
        self.last_roi_date.unwrap_or(self.start_date)
    }

    pub fn to_data(&self, plan: &Plan, now: DateTime<Utc>) -> ActivePlanData{
        ActivePlanData{
            id: self.id,
            plan: PlanData::from(plan),
            start_date: self.start_date.to_rfc3339(),
            end_date: self.end_date.to_rfc3339(),
            last_roi_date: self.last_roi_date.map(|d| d.to_rfc3339()),
            is_active: self.is_active(now),
        }
    }

}
