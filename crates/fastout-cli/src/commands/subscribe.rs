use fastout_core::error::Result;
use fastout_core::{checkout, HttpPaymentGateway, PaidPlan};
use serde_json::json;

use super::{print_json, Session};

pub fn run(plan: &str) -> Result<()> {
    let plan: PaidPlan = plan.parse()?;
    let mut session = Session::open()?;
    let gateway = HttpPaymentGateway::from_config(&session.config.payment)?;
    let pricing = session.config.payment.pricing();

    let (confirmation, event) = checkout(&mut session.store, &gateway, plan, &pricing)?;
    session.save()?;
    print_json(&json!({
        "merchant": session.config.payment.merchant_display_name,
        "amount_cents": pricing.amount_cents(plan),
        "customer": confirmation.customer,
        "event": event,
    }))
}
