use crate::models::{PhotoType, ReservationRequest, ShootingMonth, FIELD_ORDER};

const MONTH_REQUIRED_MESSAGE: &str = "촬영 예정월을 선택해주세요.";

/// One edit to one form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Name(String),
    Phone(String),
    /// Selects the type if absent, deselects it if present.
    TogglePhotoType(PhotoType),
    ShootingMonth(Option<ShootingMonth>),
    PrivacyConsent(bool),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    pub name: String,
    pub phone: String,
    pub photo_types: Vec<PhotoType>,
    pub shooting_month: Option<ShootingMonth>,
    pub privacy_consent: bool,
}

impl FormFields {
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Name(name) => self.name = name,
            FieldUpdate::Phone(phone) => self.phone = phone,
            FieldUpdate::TogglePhotoType(photo_type) => {
                if let Some(pos) = self.photo_types.iter().position(|t| *t == photo_type) {
                    self.photo_types.remove(pos);
                } else {
                    self.photo_types.push(photo_type);
                }
            }
            FieldUpdate::ShootingMonth(month) => self.shooting_month = month,
            FieldUpdate::PrivacyConsent(consent) => self.privacy_consent = consent,
        }
    }

    /// Builds the request the form would send, or the message to show next to
    /// the submit button.
    pub fn to_request(&self) -> Result<ReservationRequest, String> {
        let request = ReservationRequest {
            name: self.name.clone(),
            phone: self.phone.clone(),
            photo_types: self.photo_types.clone(),
            shooting_month: self.shooting_month.unwrap_or(ShootingMonth::MIN),
            privacy_consent: self.privacy_consent,
            referral_sources: Vec::new(),
        };

        let mut validation = request.check();
        if self.shooting_month.is_none() {
            validation.add_error("shooting_month", MONTH_REQUIRED_MESSAGE);
        }

        match validation.first_error(FIELD_ORDER) {
            None => Ok(request),
            Some(message) => Err(message.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub fields: FormFields,
    pub is_submitting: bool,
    pub is_submitted: bool,
    pub submit_error: Option<String>,
}

impl FormState {
    /// Applies `update` unless the inputs are locked. Returns whether it applied.
    pub fn apply(&mut self, update: FieldUpdate) -> bool {
        if self.inputs_locked() {
            return false;
        }
        self.fields.apply(update);
        true
    }

    /// Inputs are disabled while a request is in flight and hidden behind the
    /// thank-you banner after success.
    pub fn inputs_locked(&self) -> bool {
        self.is_submitting || self.is_submitted
    }

    pub fn can_submit(&self) -> bool {
        !self.fields.photo_types.is_empty() && !self.inputs_locked()
    }

    pub fn reset(&mut self) {
        *self = FormState::default();
    }
}
