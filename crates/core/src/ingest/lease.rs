//! Implicit monthly rent revenue generated by leases.

use propledger_shared::types::{AnalysisPeriod, RecordId, YearMonth};

use crate::records::category::RENT_LABEL;
use crate::records::{Category, FinancialRecord, Lease, RecordKind, RecordOwner, RecordSource};

impl Lease {
    /// Returns true if the lease covers any day of the month.
    #[must_use]
    pub fn is_active_in(&self, month: YearMonth) -> bool {
        let start = YearMonth::from_date(self.start_date);
        let end = self.end_date.map(YearMonth::from_date);
        month >= start && end.is_none_or(|end| month <= end)
    }
}

/// One rent record per month of `period` during which the lease is active.
///
/// The record is dated on the first of the month, or on the lease start date
/// for the first month of a lease starting mid-month.
#[must_use]
pub fn rent_records(lease: &Lease, period: &AnalysisPeriod) -> Vec<FinancialRecord> {
    period
        .months()
        .into_iter()
        .filter(|month| lease.is_active_in(*month))
        .map(|month| {
            let date = month.first_day().max(lease.start_date);
            let mut record = FinancialRecord::new(
                RecordId::new(format!("{}-{month}", lease.id)),
                RecordKind::Revenue,
                lease.monthly_rent,
                date,
                Category::new(RENT_LABEL),
                RecordOwner::Building(lease.building_id.clone()),
                RecordSource::LeaseRent,
            );
            record.reference.clone_from(&lease.unit);
            record.description.clone_from(&lease.tenant);
            record.attachment.clone_from(&lease.document);
            record
        })
        .collect()
}

/// Rent records of every lease, lease by lease.
#[must_use]
pub fn rent_records_for(leases: &[Lease], period: &AnalysisPeriod) -> Vec<FinancialRecord> {
    leases
        .iter()
        .flat_map(|lease| rent_records(lease, period))
        .collect()
}
