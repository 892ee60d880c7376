use async_trait::async_trait;

use super::outcome::NavigationOutcome;
use super::params::ParameterBag;

/// The collaborator that actually performs page transitions.
///
/// Implementations report failure through the returned outcome; the
/// [`NavigationGateway`](super::NavigationGateway) decides what a failure means.
/// Each call takes ownership of its parameter bag.
#[async_trait]
pub trait NavigationEngine: Send + Sync {
    async fn navigate(
        &self,
        uri: &str,
        params: ParameterBag,
        use_modal: Option<bool>,
        animated: Option<bool>,
    ) -> NavigationOutcome;

    async fn go_back(&self, params: ParameterBag) -> NavigationOutcome;

    async fn go_back_to_root(&self, params: ParameterBag) -> NavigationOutcome;
}
