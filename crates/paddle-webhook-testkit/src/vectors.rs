//! Golden event fixtures.
//!
//! One fixture per supported event kind, listing every signed field with
//! the exact text the sender puts on the wire. Values are already in
//! canonical form, so decoding a fixture and canonicalizing it again must
//! reproduce the same text field by field.
//!
//! Some values are chosen to catch specific regressions:
//!
//! - amounts with trailing zeros (`49.990`, `16.6600`)
//! - multi-byte UTF-8 text, whose canonical length is in bytes
//! - `&`, `=` and `?` inside URLs and free text
//! - empty values (unset consent, empty product list)

use paddle_webhook_events::EventKind;

/// All signed fields of one event, in canonical text form.
#[derive(Debug, Clone)]
pub struct EventFixture {
    pub kind: EventKind,
    pub fields: &'static [(&'static str, &'static str)],
}

impl EventFixture {
    pub fn new(kind: EventKind, fields: &'static [(&'static str, &'static str)]) -> Self {
        Self { kind, fields }
    }

    /// Look up a field's text by name.
    pub fn get(&self, name: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| *value)
    }

    /// The fixture with `name` replaced by `value`.
    pub fn with(&self, name: &str, value: &'static str) -> Vec<(&'static str, &'static str)> {
        self.fields
            .iter()
            .map(|&(field, old)| (field, if field == name { value } else { old }))
            .collect()
    }

    /// Fields with non-empty values, as a sender omitting blanks would send them.
    pub fn non_empty(&self) -> Vec<(&'static str, &'static str)> {
        self.fields
            .iter()
            .copied()
            .filter(|(_, value)| !value.is_empty())
            .collect()
    }
}

/// The fixture for one kind.
pub fn fixture(kind: EventKind) -> EventFixture {
    all_fixtures()
        .into_iter()
        .find(|f| f.kind == kind)
        .unwrap_or_else(|| panic!("no fixture for {kind}"))
}

const HIGH_RISK_TRANSACTION_CREATED: &[(&str, &str)] = &[
    ("alert_name", "high_risk_transaction_created"),
    ("case_id", "91"),
    ("checkout_id", "219-2c1f7e8b0a3d4e5-f0d91b3c2a"),
    ("created_at", "2024-03-05 09:15:02"),
    ("customer_email_address", "pat@example.com"),
    ("customer_user_id", "4412"),
    ("event_time", "2024-03-05 10:20:30"),
    ("marketing_consent", "1"),
    ("passthrough", "{\"account\":42}"),
    ("product_id", "5210"),
    ("risk_score", "87.500"),
    ("status", "pending"),
];

const HIGH_RISK_TRANSACTION_UPDATED: &[(&str, &str)] = &[
    ("alert_name", "high_risk_transaction_updated"),
    ("case_id", "91"),
    ("checkout_id", "219-2c1f7e8b0a3d4e5-f0d91b3c2a"),
    ("created_at", "2024-03-05 09:15:02"),
    ("customer_email_address", "pat@example.com"),
    ("customer_user_id", "4412"),
    ("event_time", "2024-03-05 10:20:30"),
    ("marketing_consent", "0"),
    ("passthrough", "{\"account\":42}"),
    ("product_id", "5210"),
    ("risk_score", "87.500"),
    ("status", "accepted"),
];

const LOCKER_PROCESSED: &[(&str, &str)] = &[
    ("alert_name", "locker_processed"),
    ("checkout_id", "219-2c1f7e8b0a3d4e5-f0d91b3c2a"),
    ("checkout_recovery", "0"),
    ("coupon", "SPRING-24"),
    ("download", "https://download.example.com/widget-pro.zip"),
    ("email", "pat@example.com"),
    ("event_time", "2024-03-05 10:20:30"),
    ("instructions", "Activate with the key below & enjoy"),
    ("license", "ABCD-1234-EFGH"),
    ("marketing_consent", "1"),
    ("order_id", "88231"),
    ("product_id", "5210"),
    ("quantity", "2"),
];

const NEW_AUDIENCE_MEMBER: &[(&str, &str)] = &[
    ("alert_name", "new_audience_member"),
    ("created_at", "2024-03-05 09:15:02"),
    ("email", "pat@example.com"),
    ("event_time", "2024-03-05 10:20:30"),
    ("marketing_consent", "1"),
    ("products", "14,209,3"),
    ("source", "Checkout"),
    ("subscribed", "1"),
    ("user_id", "8"),
];

const PAYMENT_DISPUTE_CLOSED: &[(&str, &str)] = &[
    ("alert_name", "payment_dispute_closed"),
    ("amount", "49.990"),
    ("checkout_id", "219-2c1f7e8b0a3d4e5-f0d91b3c2a"),
    ("currency", "USD"),
    ("email", "pat@example.com"),
    ("event_time", "2024-03-05 10:20:30"),
    ("fee_usd", "15.00"),
    ("marketing_consent", "0"),
    ("order_id", "88231"),
    ("passthrough", "{\"account\":42}"),
    ("status", "closed"),
];

const PAYMENT_DISPUTE_CREATED: &[(&str, &str)] = &[
    ("alert_name", "payment_dispute_created"),
    ("amount", "120"),
    ("checkout_id", "219-2c1f7e8b0a3d4e5-f0d91b3c2a"),
    ("currency", "USD"),
    ("email", "pat@example.com"),
    ("event_time", "2024-03-05 10:20:30"),
    ("fee_usd", "15.00"),
    ("marketing_consent", "1"),
    ("order_id", "88231"),
    ("passthrough", "{\"account\":42}"),
    ("status", "pending"),
];

const PAYMENT_REFUNDED: &[(&str, &str)] = &[
    ("alert_name", "payment_refunded"),
    ("amount", "13.50"),
    ("balance_currency", "EUR"),
    ("balance_earnings_decrease", "12.10"),
    ("balance_fee_refund", "0.84"),
    ("balance_gross_refund", "13.50"),
    ("balance_tax_refund", "0.56"),
    ("checkout_id", "219-2c1f7e8b0a3d4e5-f0d91b3c2a"),
    ("currency", "USD"),
    ("earnings_decrease", "12.1"),
    ("email", "pat@example.com"),
    ("event_time", "2024-03-05 10:20:30"),
    ("fee_refund", "0.90"),
    ("gross_refund", "13.50"),
    ("marketing_consent", "1"),
    ("order_id", "88231-4410"),
    ("passthrough", "{\"account\":42}"),
    ("quantity", "1"),
    ("refund_type", "partial"),
    ("tax_refund", "0.56"),
];

const PAYMENT_SUCCEEDED: &[(&str, &str)] = &[
    ("alert_name", "payment_succeeded"),
    ("balance_currency", "EUR"),
    ("balance_earnings", "37.51"),
    ("balance_fee", "2.75"),
    ("balance_gross", "44.71"),
    ("balance_tax", "4.45"),
    ("checkout_id", "219-2c1f7e8b0a3d4e5-f0d91b3c2a"),
    ("country", "DE"),
    ("coupon", "SPRING-24"),
    ("currency", "USD"),
    ("customer_name", "Zofia Łukasiewicz"),
    ("earnings", "41.150"),
    ("email", "pat@example.com"),
    ("event_time", "2024-03-05 10:20:30"),
    ("fee", "2.990"),
    ("ip", "203.0.113.9"),
    ("marketing_consent", "1"),
    ("order_id", "88231-4410"),
    ("passthrough", "{\"account\":42}"),
    ("payment_method", "card"),
    ("payment_tax", "4.45"),
    ("product_id", "5210"),
    ("product_name", "Widget Pro"),
    ("quantity", "1"),
    ("receipt_url", "https://my.paddle.com/receipt/88231-4410/aa11bb22"),
    ("sale_gross", "49.990"),
    ("used_price_override", "true"),
];

const TRANSFER_CREATED: &[(&str, &str)] = &[
    ("alert_name", "transfer_created"),
    ("amount", "1200.0"),
    ("currency", "USD"),
    ("event_time", "2024-03-05 10:20:30"),
    ("payout_id", "3071"),
    ("status", "unpaid"),
];

const TRANSFER_PAID: &[(&str, &str)] = &[
    ("alert_name", "transfer_paid"),
    ("amount", "-0.50"),
    ("currency", "USD"),
    ("event_time", "2024-03-05 10:20:30"),
    ("payout_id", "3071"),
    ("status", "paid"),
];

const UPDATE_AUDIENCE_MEMBER: &[(&str, &str)] = &[
    ("alert_name", "update_audience_member"),
    ("event_time", "2024-03-05 10:20:30"),
    ("new_customer_email", "new@example.com"),
    ("new_marketing_consent", "1"),
    ("old_customer_email", "old@example.com"),
    ("old_marketing_consent", "0"),
    ("products", ""),
    ("source", "Checkout"),
    ("updated_at", "2024-03-06 08:00:00"),
    ("user_id", "8"),
];

const SUBSCRIPTION_CANCELLED: &[(&str, &str)] = &[
    ("alert_name", "subscription_cancelled"),
    ("cancellation_effective_date", "2024-05-01"),
    ("checkout_id", "219-2c1f7e8b0a3d4e5-f0d91b3c2a"),
    ("currency", "USD"),
    ("email", "pat@example.com"),
    ("event_time", "2024-03-05 10:20:30"),
    ("marketing_consent", ""),
    ("passthrough", "{\"account\":42}"),
    ("quantity", "1"),
    ("status", "deleted"),
    ("subscription_id", "302145"),
    ("subscription_plan_id", "551"),
    ("unit_price", "16.6600"),
    ("user_id", "8"),
];

const SUBSCRIPTION_CREATED: &[(&str, &str)] = &[
    ("alert_id", "1789"),
    ("alert_name", "subscription_created"),
    ("cancel_url", "https://checkout.paddle.com/subscription/cancel?user=8&subscription=302145&hash=aa11"),
    ("checkout_id", "219-2c1f7e8b0a3d4e5-f0d91b3c2a"),
    ("currency", "USD"),
    ("email", "pat@example.com"),
    ("event_time", "2024-03-05 10:20:30"),
    ("marketing_consent", "1"),
    ("next_bill_date", "2024-04-05"),
    ("passthrough", "{\"account\":42}"),
    ("quantity", "1"),
    ("status", "active"),
    ("subscription_id", "302145"),
    ("subscription_plan_id", "551"),
    ("unit_price", "16.6600"),
    ("update_url", "https://checkout.paddle.com/subscription/update?user=8&subscription=302145&hash=bb22"),
];

const SUBSCRIPTION_PAYMENT_FAILED: &[(&str, &str)] = &[
    ("alert_name", "subscription_payment_failed"),
    ("amount", "16.66"),
    ("cancel_url", "https://checkout.paddle.com/subscription/cancel?user=8&subscription=302145&hash=aa11"),
    ("checkout_id", "219-2c1f7e8b0a3d4e5-f0d91b3c2a"),
    ("currency", "USD"),
    ("email", "pat@example.com"),
    ("event_time", "2024-03-05 10:20:30"),
    ("hard_failure", "1"),
    ("marketing_consent", "1"),
    ("next_retry_date", "2024-03-08"),
    ("passthrough", "{\"account\":42}"),
    ("quantity", "1"),
    ("status", "past_due"),
    ("subscription_id", "302145"),
    ("subscription_plan_id", "551"),
    ("unit_price", "16.6600"),
    ("update_url", "https://checkout.paddle.com/subscription/update?user=8&subscription=302145&hash=bb22"),
];

const SUBSCRIPTION_PAYMENT_REFUNDED: &[(&str, &str)] = &[
    ("alert_id", "1789"),
    ("alert_name", "subscription_payment_refunded"),
    ("amount", "16.6600"),
    ("balance_currency", "EUR"),
    ("balance_earnings_decrease", "12.10"),
    ("balance_fee_refund", "0.84"),
    ("balance_gross_refund", "13.50"),
    ("balance_tax_refund", "0.56"),
    ("checkout_id", "219-2c1f7e8b0a3d4e5-f0d91b3c2a"),
    ("currency", "USD"),
    ("earnings_decrease", "12.1"),
    ("email", "pat@example.com"),
    ("event_time", "2024-03-05 10:20:30"),
    ("fee_refund", "0.90"),
    ("gross_refund", "13.50"),
    ("initial_payment", "0"),
    ("instalments", "12"),
    ("marketing_consent", "1"),
    ("order_id", "88231-4410"),
    ("passthrough", "{\"account\":42}"),
    ("quantity", "1"),
    ("refund_type", "partial"),
    ("subscription_id", "302145"),
    ("subscription_payment_id", "99120"),
    ("tax_refund", "0.56"),
    ("unit_price", "16.6600"),
    ("user_id", "8"),
];

const SUBSCRIPTION_PAYMENT_SUCCEEDED: &[(&str, &str)] = &[
    ("alert_name", "subscription_payment_succeeded"),
    ("balance_currency", "EUR"),
    ("balance_earnings", "37.51"),
    ("balance_fee", "2.75"),
    ("balance_gross", "44.71"),
    ("balance_tax", "4.45"),
    ("checkout_id", "219-2c1f7e8b0a3d4e5-f0d91b3c2a"),
    ("country", "DE"),
    ("coupon", "SPRING-24"),
    ("currency", "USD"),
    ("customer_name", ""),
    ("earnings", "41.150"),
    ("email", "pat@example.com"),
    ("event_time", "2024-03-05 10:20:30"),
    ("fee", "2.990"),
    ("initial_payment", "0"),
    ("instalments", "12"),
    ("marketing_consent", "1"),
    ("next_bill_date", "2024-04-05"),
    ("order_id", "88231-4410"),
    ("passthrough", "{\"account\":42}"),
    ("payment_method", "card"),
    ("payment_tax", "4.45"),
    ("plan_name", "Pro Monthly"),
    ("quantity", "1"),
    ("receipt_url", "https://my.paddle.com/receipt/88231-4410/aa11bb22"),
    ("sale_gross", "49.990"),
    ("status", "active"),
    ("subscription_id", "302145"),
    ("subscription_plan_id", "551"),
    ("unit_price", "16.6600"),
    ("user_id", "8"),
];

const SUBSCRIPTION_UPDATED: &[(&str, &str)] = &[
    ("alert_name", "subscription_updated"),
    ("cancel_url", "https://checkout.paddle.com/subscription/cancel?user=8&subscription=302145&hash=aa11"),
    ("checkout_id", "219-2c1f7e8b0a3d4e5-f0d91b3c2a"),
    ("email", "pat@example.com"),
    ("event_time", "2024-03-05 10:20:30"),
    ("marketing_consent", "1"),
    ("new_price", "99.00"),
    ("new_quantity", "3"),
    ("new_unit_price", "33.00"),
    ("next_bill_date", "2024-04-05"),
    ("old_next_bill_date", "2024-03-28"),
    ("old_price", "60.00"),
    ("old_quantity", "2"),
    ("old_status", "trialing"),
    ("old_subscription_plan_id", "550"),
    ("old_unit_price", "30.00"),
    ("passthrough", "{\"account\":42}"),
    ("status", "active"),
    ("subscription_id", "302145"),
    ("subscription_plan_id", "551"),
    ("update_url", "https://checkout.paddle.com/subscription/update?user=8&subscription=302145&hash=bb22"),
];

pub fn all_fixtures() -> Vec<EventFixture> {
    vec![
        EventFixture::new(EventKind::HighRiskTransactionCreated, HIGH_RISK_TRANSACTION_CREATED),
        EventFixture::new(EventKind::HighRiskTransactionUpdated, HIGH_RISK_TRANSACTION_UPDATED),
        EventFixture::new(EventKind::LockerProcessed, LOCKER_PROCESSED),
        EventFixture::new(EventKind::NewAudienceMember, NEW_AUDIENCE_MEMBER),
        EventFixture::new(EventKind::PaymentDisputeClosed, PAYMENT_DISPUTE_CLOSED),
        EventFixture::new(EventKind::PaymentDisputeCreated, PAYMENT_DISPUTE_CREATED),
        EventFixture::new(EventKind::PaymentRefunded, PAYMENT_REFUNDED),
        EventFixture::new(EventKind::PaymentSucceeded, PAYMENT_SUCCEEDED),
        EventFixture::new(EventKind::TransferCreated, TRANSFER_CREATED),
        EventFixture::new(EventKind::TransferPaid, TRANSFER_PAID),
        EventFixture::new(EventKind::UpdateAudienceMember, UPDATE_AUDIENCE_MEMBER),
        EventFixture::new(EventKind::SubscriptionCancelled, SUBSCRIPTION_CANCELLED),
        EventFixture::new(EventKind::SubscriptionCreated, SUBSCRIPTION_CREATED),
        EventFixture::new(EventKind::SubscriptionPaymentFailed, SUBSCRIPTION_PAYMENT_FAILED),
        EventFixture::new(EventKind::SubscriptionPaymentRefunded, SUBSCRIPTION_PAYMENT_REFUNDED),
        EventFixture::new(EventKind::SubscriptionPaymentSucceeded, SUBSCRIPTION_PAYMENT_SUCCEEDED),
        EventFixture::new(EventKind::SubscriptionUpdated, SUBSCRIPTION_UPDATED),
    ]
}
