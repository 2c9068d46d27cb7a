/// Declare an event record.
///
/// Every listed field is a wire key and is signed. The macro adds the
/// `p_signature` field, binds each field through
/// [`deserialize_field`](paddle_webhook_core::value::deserialize_field), and
/// implements [`EventRecord`](crate::EventRecord),
/// [`SignedPayload`](paddle_webhook_core::SignedPayload) and
/// `From<Record> for Event`.
///
/// The record's variant name in [`Event`](crate::Event) and
/// [`EventKind`](crate::EventKind) must match the struct name.
macro_rules! record {
    (
        $(#[$meta:meta])*
        $name:ident = $alert:literal {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                #[serde(default, deserialize_with = "paddle_webhook_core::value::deserialize_field")]
                pub $field: $ty,
            )*
            /// Base64 signature over the other fields.
            #[serde(default, deserialize_with = "paddle_webhook_core::value::deserialize_field")]
            pub p_signature: String,
        }

        impl $crate::EventRecord for $name {
            const ALERT_NAME: &'static str = $alert;
            const KIND: $crate::EventKind = $crate::EventKind::$name;
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),*];
        }

        impl paddle_webhook_core::SignedPayload for $name {
            fn canonical_fields(
                &self,
            ) -> Result<paddle_webhook_core::FieldSet, paddle_webhook_core::FormatError> {
                let mut fields = paddle_webhook_core::FieldSet::with_capacity(
                    <Self as $crate::EventRecord>::FIELDS.len(),
                );
                $(
                    fields.push(stringify!($field), &self.$field)?;
                )*
                Ok(fields)
            }

            fn signature(&self) -> &str {
                &self.p_signature
            }
        }

        impl From<$name> for $crate::Event {
            fn from(record: $name) -> Self {
                $crate::Event::$name(record)
            }
        }
    };
}
