// services/flow.rs
use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::{AppError, Result};
use crate::models::money::Amount;
use crate::models::transaction::CompletedPayment;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    AmountInput,
    QrCode { amount: Amount },
    ManualPayment { amount: Amount },
    Confirmation { amount: Amount, phone_number: String },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::AmountInput => "amount input",
            Screen::QrCode { .. } => "QR code",
            Screen::ManualPayment { .. } => "manual payment",
            Screen::Confirmation { .. } => "confirmation",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    SubmitAmount(Amount),
    ChooseManual,
    PaymentAccepted(String),
    Back,
    Done,
}

impl fmt::Display for FlowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowEvent::SubmitAmount(_) => "submit an amount",
            FlowEvent::ChooseManual => "choose manual payment",
            FlowEvent::PaymentAccepted(_) => "accept a payment",
            FlowEvent::Back => "go back",
            FlowEvent::Done => "finish",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub next: Screen,
    pub completed: Option<CompletedPayment>,
}

impl Step {
    fn to(next: Screen) -> Self {
        Step { next, completed: None }
    }
}

/// Pure transition function. Pairs not listed here are rejected and leave
/// the caller's screen as it was.
pub fn transition(screen: &Screen, event: FlowEvent) -> Result<Step> {
    match (screen, event) {
        (Screen::AmountInput, FlowEvent::SubmitAmount(amount)) => {
            Ok(Step::to(Screen::QrCode { amount }))
        }
        (Screen::QrCode { amount }, FlowEvent::ChooseManual) => {
            Ok(Step::to(Screen::ManualPayment { amount: *amount }))
        }
        (Screen::ManualPayment { amount }, FlowEvent::PaymentAccepted(phone_number)) => {
            Ok(Step::to(Screen::Confirmation {
                amount: *amount,
                phone_number,
            }))
        }
        (Screen::QrCode { .. } | Screen::ManualPayment { .. }, FlowEvent::Back) => {
            Ok(Step::to(Screen::AmountInput))
        }
        (Screen::Confirmation { amount, .. }, FlowEvent::Back) => {
            Ok(Step::to(Screen::QrCode { amount: *amount }))
        }
        (Screen::Confirmation { amount, phone_number }, FlowEvent::Done) => Ok(Step {
            next: Screen::AmountInput,
            completed: Some(CompletedPayment {
                amount: *amount,
                phone_number: Some(phone_number.clone()).filter(|p| !p.is_empty()),
            }),
        }),
        (screen, event) => Err(AppError::invalid_transition(screen.name(), event.to_string())),
    }
}

/// The conductor's session: whichever screen is showing, and the data it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowContext {
    screen: Screen,
}

impl Default for FlowContext {
    fn default() -> Self {
        FlowContext {
            screen: Screen::AmountInput,
        }
    }
}

impl FlowContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn apply(&mut self, event: FlowEvent) -> Result<Option<CompletedPayment>> {
        let step = transition(&self.screen, event)?;
        self.screen = step.next;
        Ok(step.completed)
    }

    pub fn amount(&self) -> Decimal {
        match &self.screen {
            Screen::AmountInput => Decimal::ZERO,
            Screen::QrCode { amount }
            | Screen::ManualPayment { amount }
            | Screen::Confirmation { amount, .. } => amount.value(),
        }
    }

    pub fn phone_number(&self) -> &str {
        match &self.screen {
            Screen::Confirmation { phone_number, .. } => phone_number,
            _ => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amount(value: &str) -> Amount {
        Amount::parse(value).unwrap()
    }

    #[test]
    fn starts_on_amount_input() {
        let flow = FlowContext::new();
        assert_eq!(flow.screen(), &Screen::AmountInput);
        assert_eq!(flow.amount(), Decimal::ZERO);
        assert_eq!(flow.phone_number(), "");
    }

    #[test]
    fn happy_path_carries_amount_and_phone() {
        let mut flow = FlowContext::new();

        flow.apply(FlowEvent::SubmitAmount(amount("150"))).unwrap();
        assert_eq!(flow.screen(), &Screen::QrCode { amount: amount("150") });

        flow.apply(FlowEvent::ChooseManual).unwrap();
        assert_eq!(flow.screen(), &Screen::ManualPayment { amount: amount("150") });
        assert_eq!(flow.phone_number(), "");

        flow.apply(FlowEvent::PaymentAccepted("0712345678".into())).unwrap();
        assert_eq!(flow.amount(), dec!(150));
        assert_eq!(flow.phone_number(), "0712345678");

        let completed = flow.apply(FlowEvent::Done).unwrap().expect("done completes");
        assert_eq!(completed.amount, amount("150"));
        assert_eq!(completed.phone_number.as_deref(), Some("0712345678"));
        assert_eq!(flow.screen(), &Screen::AmountInput);
        assert_eq!(flow.amount(), Decimal::ZERO);
    }

    #[test]
    fn back_from_qr_code_discards_amount() {
        let mut flow = FlowContext::new();
        flow.apply(FlowEvent::SubmitAmount(amount("150"))).unwrap();
        flow.apply(FlowEvent::Back).unwrap();
        assert_eq!(flow.screen(), &Screen::AmountInput);
        assert_eq!(flow.amount(), Decimal::ZERO);

        flow.apply(FlowEvent::SubmitAmount(amount("80"))).unwrap();
        assert_eq!(flow.screen(), &Screen::QrCode { amount: amount("80") });
    }

    #[test]
    fn back_from_manual_returns_to_amount_input() {
        let mut flow = FlowContext::new();
        flow.apply(FlowEvent::SubmitAmount(amount("150"))).unwrap();
        flow.apply(FlowEvent::ChooseManual).unwrap();
        flow.apply(FlowEvent::Back).unwrap();
        assert_eq!(flow.screen(), &Screen::AmountInput);
    }

    #[test]
    fn back_from_confirmation_reshows_same_amount() {
        let screen = Screen::Confirmation {
            amount: amount("150"),
            phone_number: "0712345678".into(),
        };
        let step = transition(&screen, FlowEvent::Back).unwrap();
        assert_eq!(step.next, Screen::QrCode { amount: amount("150") });
        assert_eq!(step.completed, None);
    }

    #[test]
    fn screens_cannot_be_skipped() {
        let mut flow = FlowContext::new();
        for event in [
            FlowEvent::ChooseManual,
            FlowEvent::PaymentAccepted("0712345678".into()),
            FlowEvent::Back,
            FlowEvent::Done,
        ] {
            assert!(matches!(
                flow.apply(event),
                Err(AppError::InvalidTransition { .. })
            ));
        }
        assert_eq!(flow.screen(), &Screen::AmountInput);

        flow.apply(FlowEvent::SubmitAmount(amount("150"))).unwrap();
        let before = flow.clone();
        assert!(flow.apply(FlowEvent::PaymentAccepted("0712345678".into())).is_err());
        assert!(flow.apply(FlowEvent::Done).is_err());
        assert!(flow.apply(FlowEvent::SubmitAmount(amount("10"))).is_err());
        assert_eq!(flow, before);
    }

    #[test]
    fn screen_serializes_with_tag() {
        let json = serde_json::to_value(Screen::QrCode { amount: amount("150") }).unwrap();
        assert_eq!(json["screen"], "qr_code");
        assert_eq!(json["amount"], "150");
    }
}
