use linkrelay_application::ports::AdmissionPolicy;
use linkrelay_application::services::{
    AllowAllPolicy, NameAllowListPolicy, PolicyChain, SubnetPolicy,
};
use linkrelay_application::use_cases::BuildReplyUseCase;
use linkrelay_domain::config::PolicyConfig;
use linkrelay_domain::Config;
use linkrelay_infrastructure::dns::{RelayHandler, TracingQueryObserver};
use std::sync::Arc;
use tracing::{info, warn};

pub struct RelayServices {
    pub handler: Arc<RelayHandler>,
}

impl RelayServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let relay = config.relay.to_relay_config();
        if !relay.has_relay() {
            warn!("No relay gateway configured; every query will go unanswered");
        }

        let policy = Self::build_policy(&config.policy)?;
        let use_case = BuildReplyUseCase::new(relay, policy, Arc::new(TracingQueryObserver));

        Ok(Self {
            handler: Arc::new(RelayHandler::new(Arc::new(use_case))),
        })
    }

    fn build_policy(config: &PolicyConfig) -> anyhow::Result<Arc<dyn AdmissionPolicy>> {
        if config.is_unrestricted() {
            info!("Admission policy: answering every query");
            return Ok(Arc::new(AllowAllPolicy));
        }

        let mut chain = PolicyChain::new();
        if !config.allowed_subnets.is_empty() {
            chain = chain.with(Arc::new(SubnetPolicy::new(&config.allowed_subnets)?));
        }
        if !config.allowed_names.is_empty() {
            chain = chain.with(Arc::new(NameAllowListPolicy::new(&config.allowed_names)));
        }

        info!(
            subnets = config.allowed_subnets.len(),
            names = config.allowed_names.len(),
            "Admission policy: restricted"
        );
        Ok(Arc::new(chain))
    }
}
