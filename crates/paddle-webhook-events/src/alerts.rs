//! One-off alert events: payments, refunds, disputes, transfers, fraud
//! checks, locker fulfilment and audience membership.

use std::net::IpAddr;

use chrono::NaiveDateTime;
use paddle_webhook_core::{Amount, Consent, TextBool};

use crate::products::AudienceProducts;

record! {
    /// A checkout was flagged for manual fraud review.
    HighRiskTransactionCreated = "high_risk_transaction_created" {
        alert_name: String,
        case_id: Option<i64>,
        checkout_id: String,
        created_at: Option<NaiveDateTime>,
        customer_email_address: String,
        customer_user_id: Option<i64>,
        event_time: Option<NaiveDateTime>,
        marketing_consent: Consent,
        passthrough: String,
        product_id: Option<i64>,
        /// Fraud score between 0 and 100.
        risk_score: Option<Amount>,
        status: String,
    }
}

record! {
    /// A fraud review case was accepted or rejected.
    HighRiskTransactionUpdated = "high_risk_transaction_updated" {
        alert_name: String,
        case_id: Option<i64>,
        checkout_id: String,
        created_at: Option<NaiveDateTime>,
        customer_email_address: String,
        customer_user_id: Option<i64>,
        event_time: Option<NaiveDateTime>,
        marketing_consent: Consent,
        passthrough: String,
        product_id: Option<i64>,
        risk_score: Option<Amount>,
        status: String,
    }
}

record! {
    /// A license or download was issued from the product locker.
    LockerProcessed = "locker_processed" {
        alert_name: String,
        checkout_id: String,
        checkout_recovery: Option<i64>,
        coupon: String,
        download: String,
        email: String,
        event_time: Option<NaiveDateTime>,
        instructions: String,
        license: String,
        marketing_consent: Consent,
        order_id: Option<i64>,
        product_id: Option<i64>,
        quantity: Option<i64>,
    }
}

record! {
    NewAudienceMember = "new_audience_member" {
        alert_name: String,
        created_at: Option<NaiveDateTime>,
        email: String,
        event_time: Option<NaiveDateTime>,
        marketing_consent: Consent,
        products: AudienceProducts,
        source: String,
        subscribed: Option<i64>,
        user_id: Option<i64>,
    }
}

record! {
    /// A payment dispute was resolved.
    PaymentDisputeClosed = "payment_dispute_closed" {
        alert_name: String,
        amount: Option<Amount>,
        checkout_id: String,
        currency: String,
        email: String,
        event_time: Option<NaiveDateTime>,
        fee_usd: Option<Amount>,
        marketing_consent: Consent,
        order_id: Option<i64>,
        passthrough: String,
        status: String,
    }
}

record! {
    /// A customer opened a dispute (chargeback) against a payment.
    PaymentDisputeCreated = "payment_dispute_created" {
        alert_name: String,
        amount: Option<Amount>,
        checkout_id: String,
        currency: String,
        email: String,
        event_time: Option<NaiveDateTime>,
        fee_usd: Option<Amount>,
        marketing_consent: Consent,
        order_id: Option<i64>,
        passthrough: String,
        status: String,
    }
}

record! {
    /// A one-off payment was fully or partially refunded.
    PaymentRefunded = "payment_refunded" {
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
        marketing_consent: Consent,
        order_id: String,
        passthrough: String,
        quantity: Option<i64>,
        refund_type: String,
        tax_refund: Option<Amount>,
    }
}

record! {
    /// A one-off checkout completed.
    PaymentSucceeded = "payment_succeeded" {
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
        ip: Option<IpAddr>,
        marketing_consent: Consent,
        order_id: String,
        passthrough: String,
        payment_method: String,
        payment_tax: Option<Amount>,
        product_id: Option<i64>,
        product_name: String,
        quantity: Option<i64>,
        receipt_url: String,
        sale_gross: Option<Amount>,
        used_price_override: Option<TextBool>,
    }
}

record! {
    /// A payout to the seller was scheduled.
    TransferCreated = "transfer_created" {
        alert_name: String,
        amount: Option<Amount>,
        currency: String,
        event_time: Option<NaiveDateTime>,
        payout_id: Option<i64>,
        status: String,
    }
}

record! {
    /// A payout to the seller was sent.
    TransferPaid = "transfer_paid" {
        alert_name: String,
        amount: Option<Amount>,
        currency: String,
        event_time: Option<NaiveDateTime>,
        payout_id: Option<i64>,
        status: String,
    }
}

record! {
    UpdateAudienceMember = "update_audience_member" {
        alert_name: String,
        event_time: Option<NaiveDateTime>,
        new_customer_email: String,
        new_marketing_consent: Consent,
        old_customer_email: String,
        old_marketing_consent: Consent,
        products: AudienceProducts,
        source: String,
        updated_at: Option<NaiveDateTime>,
        user_id: Option<i64>,
    }
}
