use chrono::Duration;
use regex::Regex;

use crate::api::web::dto::{OrderSubmitReqDto, OrderUrgency, PaymentTerms};
use crate::constant::{checkout as CheckoutConst, REGEX_PHONE_PERMISSIVE};
use crate::error::{AppError, AppErrorCode};

impl OrderUrgency {
    pub fn lead_time(&self) -> Duration {
        match self {
            Self::Emergency => Duration::hours(CheckoutConst::LEADTIME_HOURS_EMERGENCY),
            Self::Urgent => Duration::days(CheckoutConst::LEADTIME_DAYS_URGENT),
            Self::Standard => Duration::days(CheckoutConst::LEADTIME_DAYS_STANDARD),
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Urgent => "urgent",
            Self::Emergency => "emergency",
        }
    }
}

impl TryFrom<&str> for OrderUrgency {
    type Error = AppError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "standard" => Ok(Self::Standard),
            "urgent" => Ok(Self::Urgent),
            "emergency" => Ok(Self::Emergency),
            _others => Err(AppError {
                code: AppErrorCode::DataCorruption,
                detail: Some(format!("order-urgency:{value}")),
            }),
        }
    }
}

impl PaymentTerms {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Net30 => "net30",
            Self::Net60 => "net60",
        }
    }
}

impl TryFrom<&str> for PaymentTerms {
    type Error = AppError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "immediate" => Ok(Self::Immediate),
            "net30" => Ok(Self::Net30),
            "net60" => Ok(Self::Net60),
            _others => Err(AppError {
                code: AppErrorCode::DataCorruption,
                detail: Some(format!("payment-terms:{value}")),
            }),
        }
    }
}

pub fn validate_phone(value: &str) -> bool {
    let re = Regex::new(REGEX_PHONE_PERMISSIVE).unwrap();
    re.is_match(value)
}

// the buyer-entered checkout form, applied uniformly to every per-supplier
// order produced from one submission, never persisted on its own
#[derive(Clone)]
pub struct CheckoutMetaModel {
    pub urgency: OrderUrgency,
    pub delivery_address: String,
    pub contact_person: String,
    pub phone: String,
    pub notes: Option<String>,
    pub payment_terms: PaymentTerms,
}

impl From<OrderSubmitReqDto> for CheckoutMetaModel {
    fn from(value: OrderSubmitReqDto) -> Self {
        Self {
            urgency: value.urgency,
            delivery_address: value.delivery_address,
            contact_person: value.contact_person,
            phone: value.phone,
            notes: value.notes,
            payment_terms: value.payment_terms,
        }
    }
}

impl CheckoutMetaModel {
    const MIN_CHARS_CONTACT_PERSON: usize = 2;
    const MIN_CHARS_DELIVERY_ADDR: usize = 10;

    // one message per violated rule, all collected in one pass so the client
    // renders every problem at once, message order is fixed : contact person,
    // phone, delivery address
    pub fn validate(&self) -> Vec<String> {
        let mut msgs = Vec::new();
        if self.contact_person.trim().chars().count() < Self::MIN_CHARS_CONTACT_PERSON {
            msgs.push(format!(
                "contact person is required, at least {} characters",
                Self::MIN_CHARS_CONTACT_PERSON
            ));
        }
        if !validate_phone(self.phone.as_str()) {
            msgs.push("phone number is required, in a valid format".to_string());
        }
        if self.delivery_address.trim().chars().count() < Self::MIN_CHARS_DELIVERY_ADDR {
            msgs.push(format!(
                "delivery address is required, at least {} characters",
                Self::MIN_CHARS_DELIVERY_ADDR
            ));
        }
        msgs
    }
} // end of impl CheckoutMetaModel
