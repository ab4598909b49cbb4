//! Client side of the three-step proprietor registration
//!
//! The wizard keeps each step's form data locally and only moves forward
//! after the server accepted the step. Going back is purely local.

use std::collections::BTreeMap;

use crate::client::http::ApiClient;
use crate::client::notify::{Notification, Notifier};
use crate::models::{
    PaymentInfo, PaymentInfoRequest, PersonalInfo, PersonalInfoRequest, SchoolInfo, SchoolInfoRequest, StepResponse,
};
use crate::utils::errors::{ConnectHubError, Result};
use crate::validation::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Personal,
    School,
    Payment,
    Completed,
}

impl WizardStep {
    /// Step number, with `Completed` past the last step
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Personal => 1,
            WizardStep::School => 2,
            WizardStep::Payment => 3,
            WizardStep::Completed => 4,
        }
    }

    fn previous(&self) -> Self {
        match self {
            WizardStep::Personal | WizardStep::School => WizardStep::Personal,
            WizardStep::Payment => WizardStep::School,
            WizardStep::Completed => WizardStep::Completed,
        }
    }
}

pub struct RegistrationWizard {
    client: ApiClient,
    step: WizardStep,
    submission_id: Option<String>,
    registration_number: Option<String>,
    personal: PersonalInfo,
    school: SchoolInfo,
    enrollment: BTreeMap<String, Option<i32>>,
    payment: PaymentInfo,
    notifier: Notifier,
}

impl RegistrationWizard {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            step: WizardStep::Personal,
            submission_id: None,
            registration_number: None,
            personal: PersonalInfo::default(),
            school: SchoolInfo::default(),
            enrollment: BTreeMap::new(),
            payment: PaymentInfo::default(),
            notifier: Notifier::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn submission_id(&self) -> Option<&str> {
        self.submission_id.as_deref()
    }

    pub fn registration_number(&self) -> Option<&str> {
        self.registration_number.as_deref()
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifier.last()
    }

    /// Percentage shown on the progress bar: 0, 50, 100
    pub fn progress(&self) -> u8 {
        let step = self.step.number().min(3);
        (step - 1) * 100 / (3 - 1)
    }

    pub fn personal_mut(&mut self) -> &mut PersonalInfo {
        &mut self.personal
    }

    pub fn school_mut(&mut self) -> &mut SchoolInfo {
        &mut self.school
    }

    /// Set one enrollment count, e.g. `primary1_female`
    pub fn set_enrollment(&mut self, key: &str, value: Option<i32>) {
        self.enrollment.insert(key.to_string(), value);
    }

    pub fn payment_mut(&mut self) -> &mut PaymentInfo {
        &mut self.payment
    }

    /// Return to the previous step without contacting the server
    pub fn back(&mut self) {
        self.step = self.step.previous();
    }

    fn expect_step(&self, expected: WizardStep) -> Result<()> {
        if self.step != expected {
            return Err(ConnectHubError::InvalidStateTransition {
                from: format!("step {}", self.step.number()),
                to: format!("step {}", expected.number()),
            });
        }
        Ok(())
    }

    fn require_submission_id(&self) -> Result<String> {
        self.submission_id
            .clone()
            .ok_or_else(|| ConnectHubError::InvalidInput("Complete step 1 first".to_string()))
    }

    fn check<T: Validate>(&mut self, request: &T) -> Result<()> {
        if let Err(errors) = request.validate() {
            let message = errors
                .errors()
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_default();
            self.notifier.error("Please check the form", message);
            return Err(errors.into());
        }
        Ok(())
    }

    async fn post_step<T: serde::Serialize>(&mut self, path: &str, request: &T) -> Result<StepResponse> {
        match self.client.post::<_, StepResponse>(path, request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                let message = match &e {
                    ConnectHubError::Api { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                self.notifier.error("Registration failed", message);
                Err(e)
            }
        }
    }

    /// Step 1; advances only once the server returned a submission id
    pub async fn submit_step1(&mut self) -> Result<StepResponse> {
        self.expect_step(WizardStep::Personal)?;
        let request = PersonalInfoRequest {
            submission_id: self.submission_id.clone(),
            personal: self.personal.clone(),
        };
        self.check(&request)?;

        let response = self.post_step("/api/registration/step1", &request).await?;
        if response.submission_id.trim().is_empty() {
            self.notifier.error("Registration failed", "No submission ID received");
            return Err(ConnectHubError::Api {
                status: 200,
                message: "No submission ID received".to_string(),
            });
        }

        self.submission_id = Some(response.submission_id.clone());
        self.step = WizardStep::School;
        self.notifier.success("Step 1 complete", response.message.clone());
        Ok(response)
    }

    pub async fn submit_step2(&mut self) -> Result<StepResponse> {
        self.expect_step(WizardStep::School)?;
        let request = SchoolInfoRequest {
            submission_id: self.require_submission_id()?,
            school: self.school.clone(),
            enrollment: self.enrollment.clone(),
        };
        self.check(&request)?;

        let response = self.post_step("/api/registration/step2", &request).await?;
        self.step = WizardStep::Payment;
        self.notifier.success("Step 2 complete", response.message.clone());
        Ok(response)
    }

    /// Final step; submits the registration
    pub async fn submit_step3(&mut self, confirm_accuracy: bool) -> Result<StepResponse> {
        self.expect_step(WizardStep::Payment)?;
        let request = PaymentInfoRequest {
            submission_id: self.require_submission_id()?,
            payment: self.payment.clone(),
            confirm_accuracy,
            final_submit: true,
        };
        self.check(&request)?;

        let response = self.post_step("/api/registration/step3", &request).await?;
        self.registration_number = response.registration_number.clone();
        self.step = WizardStep::Completed;
        self.notifier.success("Registration submitted", response.message.clone());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard() -> RegistrationWizard {
        RegistrationWizard::new(ApiClient::new("http://127.0.0.1:9").unwrap())
    }

    #[test]
    fn test_progress_by_step() {
        let mut wizard = wizard();
        assert_eq!(wizard.progress(), 0);
        wizard.step = WizardStep::School;
        assert_eq!(wizard.progress(), 50);
        wizard.step = WizardStep::Payment;
        assert_eq!(wizard.progress(), 100);
        wizard.step = WizardStep::Completed;
        assert_eq!(wizard.progress(), 100);
    }

    #[test]
    fn test_back_is_local_and_bounded() {
        let mut wizard = wizard();
        wizard.back();
        assert_eq!(wizard.step(), WizardStep::Personal);

        wizard.step = WizardStep::Payment;
        wizard.back();
        assert_eq!(wizard.step(), WizardStep::School);
        wizard.back();
        assert_eq!(wizard.step(), WizardStep::Personal);
    }

    #[tokio::test]
    async fn test_steps_out_of_order_are_refused() {
        let mut wizard = wizard();
        assert!(matches!(
            wizard.submit_step2().await,
            Err(ConnectHubError::InvalidStateTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_step1_blocks_submission() {
        let mut wizard = wizard();
        assert!(matches!(wizard.submit_step1().await, Err(ConnectHubError::Validation(_))));
        assert_eq!(wizard.step(), WizardStep::Personal);
        assert!(wizard.submission_id().is_none());
    }
}
