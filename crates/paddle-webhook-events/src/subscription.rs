//! Subscription lifecycle and recurring payment events.

use chrono::{NaiveDate, NaiveDateTime};
use paddle_webhook_core::{Amount, Consent};

record! {
    SubscriptionCancelled = "subscription_cancelled" {
        alert_name: String,
        cancellation_effective_date: Option<NaiveDate>,
        checkout_id: String,
        currency: String,
        email: String,
        event_time: Option<NaiveDateTime>,
        marketing_consent: Consent,
        passthrough: String,
        quantity: Option<i64>,
        status: String,
        subscription_id: Option<i64>,
        subscription_plan_id: Option<i64>,
        unit_price: Option<Amount>,
        user_id: Option<i64>,
    }
}

record! {
    SubscriptionCreated = "subscription_created" {
        alert_id: Option<i64>,
        alert_name: String,
        cancel_url: String,
        checkout_id: String,
        currency: String,
        email: String,
        event_time: Option<NaiveDateTime>,
        marketing_consent: Consent,
        next_bill_date: Option<NaiveDate>,
        passthrough: String,
        quantity: Option<i64>,
        status: String,
        subscription_id: Option<i64>,
        subscription_plan_id: Option<i64>,
        unit_price: Option<Amount>,
        update_url: String,
    }
}

record! {
    /// A recurring payment failed; the subscription may be retried.
    SubscriptionPaymentFailed = "subscription_payment_failed" {
        alert_name: String,
        amount: Option<Amount>,
        cancel_url: String,
        checkout_id: String,
        currency: String,
        email: String,
        event_time: Option<NaiveDateTime>,
        /// Set when no further retries will be attempted.
        hard_failure: Option<bool>,
        marketing_consent: Consent,
        next_retry_date: Option<NaiveDate>,
        passthrough: String,
        quantity: Option<i64>,
        status: String,
        subscription_id: Option<i64>,
        subscription_plan_id: Option<i64>,
        unit_price: Option<Amount>,
        update_url: String,
    }
}

record! {
    SubscriptionPaymentRefunded = "subscription_payment_refunded" {
        alert_id: Option<i64>,
        alert_name: String,
        amount: Option<Amount>,
        balance_currency: String,
        balance_earnings_decrease: Option<Amount>,
        balance_fee_refund: Option<Amount>,
        balance_gross_refund: Option<Amount>,
        balance_tax_refund: Option<Amount>,
        checkout_id: String,
        currency: String,
        earnings_decrease: Option<Amount>,
        email: String,
        event_time: Option<NaiveDateTime>,
        fee_refund: Option<Amount>,
        gross_refund: Option<Amount>,
        initial_payment: Option<i64>,
        instalments: Option<i64>,
        marketing_consent: Consent,
        order_id: String,
        passthrough: String,
        quantity: Option<i64>,
        refund_type: String,
        subscription_id: Option<i64>,
        subscription_payment_id: Option<i64>,
        tax_refund: Option<Amount>,
        unit_price: Option<Amount>,
        user_id: Option<i64>,
    }
}

record! {
    SubscriptionPaymentSucceeded = "subscription_payment_succeeded" {
        alert_name: String,
        balance_currency: String,
        balance_earnings: Option<Amount>,
        balance_fee: Option<Amount>,
        balance_gross: Option<Amount>,
        balance_tax: Option<Amount>,
        checkout_id: String,
        country: String,
        coupon: String,
        currency: String,
        customer_name: String,
        earnings: Option<Amount>,
        email: String,
        event_time: Option<NaiveDateTime>,
        fee: Option<Amount>,
        initial_payment: Option<i64>,
        instalments: Option<i64>,
        marketing_consent: Consent,
        next_bill_date: Option<NaiveDate>,
        order_id: String,
        passthrough: String,
        payment_method: String,
        payment_tax: Option<Amount>,
        plan_name: String,
        quantity: Option<i64>,
        receipt_url: String,
        sale_gross: Option<Amount>,
        status: String,
        subscription_id: Option<i64>,
        subscription_plan_id: Option<i64>,
        unit_price: Option<Amount>,
        user_id: Option<i64>,
    }
}

record! {
    /// Plan, price, quantity or billing date of a subscription changed.
    SubscriptionUpdated = "subscription_updated" {
        alert_name: String,
        cancel_url: String,
        checkout_id: String,
        email: String,
        event_time: Option<NaiveDateTime>,
        marketing_consent: Consent,
        new_price: Option<Amount>,
        new_quantity: Option<i64>,
        new_unit_price: Option<Amount>,
        next_bill_date: Option<NaiveDate>,
        old_next_bill_date: Option<NaiveDate>,
        old_price: Option<Amount>,
        old_quantity: Option<i64>,
        old_status: String,
        old_subscription_plan_id: Option<i64>,
        old_unit_price: Option<Amount>,
        passthrough: String,
        status: String,
        subscription_id: Option<i64>,
        subscription_plan_id: Option<i64>,
        update_url: String,
    }
}
