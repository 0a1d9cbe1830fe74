//! Fixed catalogue of integrations shown on the dashboard.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Where logo files are served from.
pub const LOGO_PATH: &str = "/assets/logos";

/// Handle to a logo file under [`LOGO_PATH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoRef(&'static str);

impl LogoRef {
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        self.0
    }

    #[must_use]
    pub fn url(self) -> String {
        format!("{LOGO_PATH}/{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegrationDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub logo: LogoRef,
    pub connected: bool,
    pub description: &'static str,
    pub coming_soon: bool,
}

pub const INTEGRATIONS: [IntegrationDescriptor; 6] = [
    IntegrationDescriptor {
        id: "1",
        name: "Whoop",
        logo: LogoRef("whoop.png"),
        connected: false,
        description: "Track your recovery and daily strain",
        coming_soon: false,
    },
    IntegrationDescriptor {
        id: "2",
        name: "Apple Health",
        logo: LogoRef("applehealth.png"),
        connected: false,
        description: "Sync your health and fitness data",
        coming_soon: false,
    },
    IntegrationDescriptor {
        id: "3",
        name: "Strava",
        logo: LogoRef("strava.png"),
        connected: false,
        description: "Connect your running and cycling activities",
        coming_soon: false,
    },
    IntegrationDescriptor {
        id: "4",
        name: "Garmin",
        logo: LogoRef("garmin.png"),
        connected: false,
        description: "Monitor your sports activities and performance",
        coming_soon: true,
    },
    IntegrationDescriptor {
        id: "5",
        name: "Zwift",
        logo: LogoRef("zwift.png"),
        connected: false,
        description: "Connect for indoor cycling and virtual training",
        coming_soon: true,
    },
    IntegrationDescriptor {
        id: "6",
        name: "Runna",
        logo: LogoRef("runna.png"),
        connected: false,
        description: "Seamlessly track your running workouts",
        coming_soon: true,
    },
];

/// The control a card shows. None of them trigger anything.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Affordance {
    Connect,
    Disconnect,
    ComingSoon,
}

impl Affordance {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Connect => "Connect",
            Self::Disconnect => "Disconnect",
            Self::ComingSoon => "Coming Soon",
        }
    }

    #[must_use]
    pub const fn enabled(self) -> bool {
        !matches!(self, Self::ComingSoon)
    }
}

impl IntegrationDescriptor {
    /// `coming_soon` wins over `connected`.
    #[must_use]
    pub const fn affordance(&self) -> Affordance {
        if self.coming_soon {
            Affordance::ComingSoon
        } else if self.connected {
            Affordance::Disconnect
        } else {
            Affordance::Connect
        }
    }
}

/// Wire form of a descriptor for the JSON API.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationCard {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub connected: bool,
    pub description: String,
    pub coming_soon: bool,
    pub affordance: Affordance,
    pub enabled: bool,
}

impl From<&IntegrationDescriptor> for IntegrationCard {
    fn from(descriptor: &IntegrationDescriptor) -> Self {
        let affordance = descriptor.affordance();
        Self {
            id: descriptor.id.to_string(),
            name: descriptor.name.to_string(),
            logo: descriptor.logo.url(),
            connected: descriptor.connected,
            description: descriptor.description.to_string(),
            coming_soon: descriptor.coming_soon,
            affordance,
            enabled: affordance.enabled(),
        }
    }
}

#[must_use]
pub fn cards() -> Vec<IntegrationCard> {
    INTEGRATIONS.iter().map(IntegrationCard::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalogue_has_six_unique_entries() {
        let ids: HashSet<_> = INTEGRATIONS.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), 6);

        let names: Vec<_> = INTEGRATIONS.iter().map(|i| i.name).collect();
        assert_eq!(
            names,
            ["Whoop", "Apple Health", "Strava", "Garmin", "Zwift", "Runna"]
        );
    }

    #[test]
    fn available_integrations_offer_connect() {
        for integration in INTEGRATIONS.iter().filter(|i| !i.coming_soon) {
            assert!(!integration.connected);
            assert_eq!(integration.affordance(), Affordance::Connect);
            assert!(integration.affordance().enabled());
        }
    }

    #[test]
    fn coming_soon_is_disabled() {
        let coming_soon: Vec<_> = INTEGRATIONS
            .iter()
            .filter(|i| i.coming_soon)
            .map(|i| i.name)
            .collect();
        assert_eq!(coming_soon, ["Garmin", "Zwift", "Runna"]);
        assert!(!Affordance::ComingSoon.enabled());
        assert_eq!(Affordance::ComingSoon.label(), "Coming Soon");
    }

    #[test]
    fn connected_integration_offers_disconnect() {
        let mut strava = INTEGRATIONS[2];
        strava.connected = true;
        assert_eq!(strava.affordance(), Affordance::Disconnect);

        strava.coming_soon = true;
        assert_eq!(strava.affordance(), Affordance::ComingSoon);
    }

    #[test]
    fn cards_carry_logo_urls() {
        let cards = cards();
        assert_eq!(cards.len(), 6);
        assert_eq!(cards[0].logo, "/assets/logos/whoop.png");
        assert_eq!(cards[1].logo, "/assets/logos/applehealth.png");
        assert_eq!(cards[3].affordance, Affordance::ComingSoon);
        assert!(!cards[3].enabled);
    }
}
