//! Promo code resolution.
//!
//! Codes are matched trimmed and case-insensitively, first against the
//! locally configured catalogue and then against the processor's coupons.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::errors::EngineError;
use crate::ports::PaymentProvider;

/// Where a promo code was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoSource {
    Catalogue,
    Processor,
}

/// A promo code mapped to the processor coupon it applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPromo {
    /// Normalised code.
    pub code: String,
    pub coupon_id: String,
    pub source: PromoSource,
}

pub struct PromoCodeResolver {
    catalogue: HashMap<String, String>,
    payment_provider: Arc<dyn PaymentProvider>,
}

impl PromoCodeResolver {
    /// `catalogue` maps promo codes to processor coupon ids.
    pub fn new<I, K, V>(catalogue: I, payment_provider: Arc<dyn PaymentProvider>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            catalogue: catalogue
                .into_iter()
                .map(|(code, coupon)| (normalize(code.as_ref()), coupon.into()))
                .collect(),
            payment_provider,
        }
    }

    /// Resolves a promo code.
    ///
    /// A blank code means no promo. An unknown code is a validation failure;
    /// a processor error during lookup is an upstream failure.
    pub async fn resolve(&self, code: &str) -> Result<Option<ResolvedPromo>, EngineError> {
        let code = normalize(code);
        if code.is_empty() {
            return Ok(None);
        }

        if let Some(coupon_id) = self.catalogue.get(&code) {
            return Ok(Some(ResolvedPromo {
                code,
                coupon_id: coupon_id.clone(),
                source: PromoSource::Catalogue,
            }));
        }

        let coupon = self.payment_provider.find_coupon(&code).await.map_err(|e| {
            tracing::warn!("Promo code lookup failed: {}", e);
            EngineError::from(e)
        })?;

        match coupon {
            Some(coupon) => Ok(Some(ResolvedPromo {
                code,
                coupon_id: coupon.id,
                source: PromoSource::Processor,
            })),
            None => Err(EngineError::validation(
                "promo_code",
                format!("promo code '{}' is not valid", code),
            )),
        }
    }
}

fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::payment::MockPaymentProvider;
    use crate::domain::errors::ErrorKind;
    use crate::ports::{Coupon, PaymentError};

    fn resolver(mock: &MockPaymentProvider) -> PromoCodeResolver {
        PromoCodeResolver::new([("SPRING24", "co_local")], Arc::new(mock.clone()))
    }

    #[tokio::test]
    async fn catalogue_match_skips_processor() {
        let mock = MockPaymentProvider::new();
        let promo = resolver(&mock).resolve("  spring24 ").await.unwrap().unwrap();
        assert_eq!(promo.coupon_id, "co_local");
        assert_eq!(promo.source, PromoSource::Catalogue);
        assert!(!mock.was_called("find_coupon"));
    }

    #[tokio::test]
    async fn falls_back_to_processor() {
        let mock = MockPaymentProvider::new();
        mock.add_coupon(Coupon {
            id: "co_remote".to_string(),
            code: "FRIEND".to_string(),
            percent_off: None,
            amount_off_cents: Some(2500),
        });
        let promo = resolver(&mock).resolve("friend").await.unwrap().unwrap();
        assert_eq!(promo.coupon_id, "co_remote");
        assert_eq!(promo.source, PromoSource::Processor);
    }

    #[tokio::test]
    async fn unknown_code_is_validation_failure() {
        let mock = MockPaymentProvider::new();
        let err = resolver(&mock).resolve("NOPE").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    }

    #[tokio::test]
    async fn processor_error_is_upstream_failure() {
        let mock = MockPaymentProvider::new();
        mock.set_method_error("find_coupon", PaymentError::network("timeout"));
        let err = resolver(&mock).resolve("OTHER").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    }

    #[tokio::test]
    async fn blank_code_is_no_promo() {
        let mock = MockPaymentProvider::new();
        assert!(resolver(&mock).resolve("   ").await.unwrap().is_none());
    }
}
