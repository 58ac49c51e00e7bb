//! Sample leads for first runs and offline fallback

use crate::lead::{Lead, LeadDraft, LeadId, LeadStatus};
use chrono::{DateTime, Duration, Utc};

/// Five sample leads, one per status, timestamped relative to `now`
#[must_use]
pub fn demo_leads(now: DateTime<Utc>) -> Vec<Lead> {
    let samples = [
        (
            "1",
            LeadDraft::new("John Doe", "Innovate Corp")
                .with_phone("+1-555-123-4567")
                .with_status(LeadStatus::New)
                .with_notes("Met at the tech conference. Interested in our AI solutions. Follow up about pricing."),
            Duration::minutes(5),
        ),
        (
            "2",
            LeadDraft::new("Jane Smith", "Solutions Inc.")
                .with_phone("+1-555-987-6543")
                .with_status(LeadStatus::Contacted)
                .with_notes("Had a brief call. Sent them our brochure. Needs to discuss with her team."),
            Duration::hours(2),
        ),
        (
            "3",
            LeadDraft::new("Peter Jones", "Future Enterprises")
                .with_phone("+1-555-555-5555")
                .with_status(LeadStatus::Qualified)
                .with_notes("Demo scheduled for next week. Very promising lead."),
            Duration::hours(24),
        ),
        (
            "4",
            LeadDraft::new("Mary Garcia", "Data Dynamics")
                .with_phone("+1-555-111-2222")
                .with_status(LeadStatus::Lost)
                .with_notes("Chose a competitor due to budget constraints."),
            Duration::hours(48),
        ),
        (
            "5",
            LeadDraft::new("Carlos Hernandez", "Synergy Systems")
                .with_phone("+1-555-333-4444")
                .with_status(LeadStatus::Won)
                .with_notes("Signed the contract today! Great win for the team."),
            Duration::minutes(30),
        ),
    ];

    samples
        .into_iter()
        .filter_map(|(id, draft, age)| {
            LeadId::new(id).ok().map(|id| Lead::new(id, draft, now - age))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::Reconciler;
    use std::collections::HashSet;

    #[test]
    fn demo_set_covers_every_status() {
        let leads = demo_leads(Utc::now());
        assert_eq!(leads.len(), 5);
        let statuses: HashSet<_> = leads.iter().map(|l| l.status).collect();
        assert_eq!(statuses.len(), LeadStatus::ALL.len());
    }

    #[test]
    fn demo_set_orders_by_age() {
        let leads = Reconciler::new(demo_leads(Utc::now())).by_recency();
        let names: Vec<_> = leads.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(
            names,
            ["John Doe", "Carlos Hernandez", "Jane Smith", "Peter Jones", "Mary Garcia"]
        );
    }
}
