mod form;

pub use form::OnboardingProfileForm;
