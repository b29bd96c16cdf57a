

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Serialize, Deserialize};
use crate::misc::format_amount;
use crate::schema::plans;


/*

    diesel migration generate plans ---> create plans migration sql files
    diesel migration run            ---> apply sql files to db
    diesel migration redo           ---> drop tables

*/

#[derive(Identifiable, Selectable, Queryable, Clone, Debug, PartialEq)]
#[diesel(table_name=plans)]
pub struct Plan{
    pub id: i32,
    pub name: String,
    pub stake: i64, // cents
    pub daily_roi: i32, // percentage, 20 means 20%
    pub duration: i32, // days
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Clone, Debug, PartialEq)]
#[diesel(table_name=plans)]
pub struct NewPlan{
    pub name: String,
    pub stake: i64,
    pub daily_roi: i32,
    pub duration: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlanData{
    pub id: i32,
    pub name: String,
    pub stake: String,
    pub daily_roi: i32,
    pub daily_return: String,
    pub duration: i32,
}

impl From<&Plan> for PlanData{
    fn from(plan: &Plan) -> Self{
        PlanData{
            id: plan.id,
            name: plan.name.clone(),
            stake: format_amount(plan.stake),
            daily_roi: plan.daily_roi,
            daily_return: format_amount(plan.daily_credit()),
            duration: plan.duration,
        }
    }
}

impl Plan{

    /* simple interest on the stake, credited once per calendar day */
    pub fn daily_credit(&self) -> i64{
        self.stake * i64::from(self.daily_roi) / 100
    }

}
