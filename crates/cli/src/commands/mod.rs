//! CLI subcommands and the backend they run against

pub mod catalog;
pub mod export;
pub mod recommend;

use advisor_lib::{
    audit::FileAuditSink, to_csv, Advice, Advisor, AdvisorError, Catalog, Profile,
    ProfileSelection, Requester, SizingInput, WorkloadRole,
};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::client::{ApiClient, RecommendRequest};

/// Header the service uses to report an export that was not audited
const AUDIT_WARNING_HEADER: &str = "x-audit-warning";

/// Where recommendations are computed
pub enum Backend {
    /// In-process engine with a local audit log
    Local(Advisor),
    /// Remote advisor service
    Remote(ApiClient),
}

impl Backend {
    pub fn local(audit_log: PathBuf) -> Self {
        debug!(audit_log = %audit_log.display(), "Using local engine");
        let advisor = Advisor::new(advisor_lib::StructuredLogger::new("pgadvisor-cli"))
            .with_audit_sink(Arc::new(FileAuditSink::new(audit_log)));
        Backend::Local(advisor)
    }

    pub fn remote(api_url: &str) -> Result<Self> {
        debug!(api_url = %api_url, "Using remote advisor service");
        Ok(Backend::Remote(ApiClient::new(api_url)?))
    }

    pub async fn recommend(
        &self,
        sizing: SizingInput,
        role: WorkloadRole,
        requester: Requester,
    ) -> Result<Advice> {
        match self {
            Backend::Local(advisor) => advisor
                .advise(sizing, role, requester)
                .await
                .map_err(with_guidance),
            Backend::Remote(client) => {
                let request = RecommendRequest {
                    cpu_count: sizing.cpu_count,
                    memory_gb: sizing.memory_gb,
                    role: role.as_str().to_string(),
                    ticket_id: requester.ticket_id,
                    email: requester.email,
                };
                client.post("api/v1/recommendations", &request).await
            }
        }
    }

    pub async fn catalog(&self, role: Option<WorkloadRole>) -> Result<Catalog> {
        match self {
            Backend::Local(_) => Ok(Catalog::for_role(role)),
            Backend::Remote(client) => {
                let path = match role {
                    Some(role) => format!("api/v1/catalog?role={}", role.as_str()),
                    None => "api/v1/catalog".to_string(),
                };
                client.get(&path).await
            }
        }
    }

    /// CSV for one request, audited like `recommend`; also returns audit warnings
    pub async fn export(
        &self,
        sizing: SizingInput,
        role: WorkloadRole,
        profile: Option<Profile>,
        requester: Requester,
    ) -> Result<(String, Vec<String>)> {
        match self {
            Backend::Local(advisor) => {
                let advice = advisor
                    .advise(sizing, role, requester)
                    .await
                    .map_err(with_guidance)?;
                let csv = to_csv(&advice.recommendation, ProfileSelection::from(profile))
                    .context("Failed to render CSV")?;
                let warnings = advice.warnings.iter().map(ToString::to_string).collect();
                Ok((csv, warnings))
            }
            Backend::Remote(client) => {
                let mut query = url::form_urlencoded::Serializer::new(String::new());
                query
                    .append_pair("cpu_count", &sizing.cpu_count.to_string())
                    .append_pair("memory_gb", &sizing.memory_gb.to_string())
                    .append_pair("role", role.as_str());
                if let Some(profile) = profile {
                    query.append_pair("profile", profile.as_str());
                }
                if let Some(ticket) = &requester.ticket_id {
                    query.append_pair("ticket_id", ticket);
                }
                if let Some(email) = &requester.email {
                    query.append_pair("email", email);
                }
                let path = format!("api/v1/recommendations/export?{}", query.finish());

                let (csv, warning) = client
                    .get_text_with_header(&path, AUDIT_WARNING_HEADER)
                    .await?;
                Ok((csv, warning.into_iter().collect()))
            }
        }
    }
}

/// Build the sizing from raw flags, reporting engine guidance on failure
pub fn sizing(cpus: u32, memory_gb: u32) -> Result<SizingInput> {
    SizingInput::new(cpus.into(), memory_gb.into()).map_err(with_guidance)
}

fn with_guidance(error: AdvisorError) -> anyhow::Error {
    anyhow::anyhow!("{}. {}", error, error.guidance())
}
