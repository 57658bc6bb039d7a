use crate::config::Config;
use crate::errors::{CourtScanError, CourtResult};
use crate::providers::better::BetterProvider;
use crate::providers::citysport::CitySportProvider;
use crate::providers::traits::ProviderFeed;

pub struct ProviderRegistry {
    providers: Vec<Box<dyn ProviderFeed>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Registry with every built-in provider, in refresh order
    pub fn from_config(config: &Config) -> CourtResult<Self> {
        let mut registry = Self::new();

        registry.register(Box::new(BetterProvider::new(config)));
        registry.register(Box::new(CitySportProvider::new(config)?));

        Ok(registry)
    }

    pub fn register(&mut self, provider: Box<dyn ProviderFeed>) {
        self.providers.push(provider);
    }

    pub fn providers(&self) -> impl Iterator<Item = &dyn ProviderFeed> {
        self.providers.iter().map(|p| p.as_ref())
    }

    /// Find a provider by organisation identifier
    pub fn find(&self, organisation: &str) -> CourtResult<&dyn ProviderFeed> {
        self.providers()
            .find(|p| p.organisation() == organisation)
            .ok_or_else(|| CourtScanError::UnsupportedProvider(organisation.to_string()))
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{better, citysport};

    #[test]
    fn test_builtin_providers_in_order() {
        let registry = ProviderRegistry::from_config(&Config::for_tests()).unwrap();

        let organisations: Vec<&str> = registry.providers().map(|p| p.organisation()).collect();
        assert_eq!(organisations, vec![better::ORGANISATION, citysport::ORGANISATION]);
    }

    #[test]
    fn test_find_by_organisation() {
        let registry = ProviderRegistry::from_config(&Config::for_tests()).unwrap();

        let provider = registry.find("citysport.org.uk").unwrap();
        assert_eq!(provider.days_ahead(), 30);

        let provider = registry.find("better.org.uk").unwrap();
        assert_eq!(provider.days_ahead(), 6);
    }

    #[test]
    fn test_unknown_organisation() {
        let registry = ProviderRegistry::from_config(&Config::for_tests()).unwrap();

        let result = registry.find("everyoneactive.com");
        assert!(matches!(result, Err(CourtScanError::UnsupportedProvider(_))));
    }

    #[test]
    fn test_invalid_citysport_url_rejected() {
        let mut config = Config::for_tests();
        config.citysport_url = "not a url".to_string();

        assert!(matches!(
            ProviderRegistry::from_config(&config),
            Err(CourtScanError::InvalidUrl(_))
        ));
    }
}
