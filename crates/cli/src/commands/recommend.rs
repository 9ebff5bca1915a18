//! `pgadvisor recommend`

use advisor_lib::{Profile, ProfileSelection, Requester, WorkloadRole};
use anyhow::Result;

use super::{sizing, Backend};
use crate::output::{
    print_audit_warnings, print_banner, print_json, print_recommendation_table, OutputFormat,
};

pub struct RecommendArgs {
    pub cpus: u32,
    pub memory_gb: u32,
    pub role: WorkloadRole,
    pub profile: Option<Profile>,
    pub ticket: Option<String>,
    pub email: Option<String>,
}

/// Check the optional requester fields before anything is computed
pub fn requester(ticket: Option<String>, email: Option<String>) -> Result<Requester> {
    if let Some(ticket) = &ticket {
        if ticket.trim().is_empty() {
            anyhow::bail!("Ticket ID must not be blank");
        }
    }
    if let Some(email) = &email {
        if !email.contains('@') {
            anyhow::bail!("Invalid email address '{}'", email);
        }
    }
    Ok(Requester::new(
        ticket.map(|t| t.trim().to_string()),
        email.map(|e| e.trim().to_string()),
    ))
}

pub async fn run(backend: &Backend, args: RecommendArgs, format: OutputFormat) -> Result<()> {
    let requester = requester(args.ticket, args.email)?;
    let sizing = sizing(args.cpus, args.memory_gb)?;

    let advice = backend.recommend(sizing, args.role, requester).await?;
    let selection = ProfileSelection::from(args.profile);

    match format {
        OutputFormat::Table => {
            print_banner();
            print_recommendation_table(&advice, selection);
        }
        OutputFormat::Json => match args.profile {
            Some(profile) => print_json(advice.recommendation.profile(profile))?,
            None => print_json(&advice)?,
        },
        OutputFormat::Csv => {
            print!("{}", advisor_lib::to_csv(&advice.recommendation, selection)?);
        }
    }

    print_audit_warnings(&advice.warnings, format);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requester_checks() {
        assert!(requester(Some("   ".into()), None).is_err());
        assert!(requester(None, Some("dba.example.com".into())).is_err());

        let requester = requester(Some(" INC-7 ".into()), Some("dba@example.com".into())).unwrap();
        assert_eq!(requester.ticket_id.as_deref(), Some("INC-7"));
        assert_eq!(requester.email.as_deref(), Some("dba@example.com"));
    }

    #[test]
    fn test_anonymous_requester() {
        let requester = requester(None, None).unwrap();
        assert_eq!(requester, Requester::default());
    }
}
