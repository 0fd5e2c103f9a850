//! Printable report and its CSV export.

use chrono::NaiveDateTime;

use crate::coordinator::TableQuery;
use crate::domain::query::{PageQuery, REPORT_PAGE_SIZE, SortColumn, SortDirection};
use crate::dto::reports::ReportData;
use crate::repository::CustomerReader;
use crate::services::{ServiceError, ServiceResult};

/// Every customer matching the bucket and search of `table`, sorted by name
/// ascending, in a single page.
pub fn load_report<R>(repo: &R, table: &TableQuery, now: NaiveDateTime) -> ServiceResult<ReportData>
where
    R: CustomerReader + ?Sized,
{
    let mut query = PageQuery::new(1, REPORT_PAGE_SIZE)
        .filter(table.filter())
        .sort(SortColumn::Name, SortDirection::Asc);
    if let Some(term) = table.search() {
        query = query.search(term);
    }

    let page = repo.list_customers(&query, now).map_err(|err| {
        log::error!("Failed to load report rows: {err}");
        err
    })?;

    Ok(ReportData {
        customers: page.items,
        total_count: page.total_count,
        filter: query.filter,
        search: query.search,
        generated_at: now,
    })
}

const CSV_HEADER: [&str; 12] = [
    "id",
    "nome",
    "email",
    "telefone",
    "endereco",
    "idade",
    "interesses",
    "sentimentos",
    "valores",
    "outras_informacoes",
    "status",
    "data_cadastro",
];

/// Renders the report rows as CSV with a header line.
pub fn export_csv(report: &ReportData) -> ServiceResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for customer in &report.customers {
        writer.write_record([
            customer.id.to_string(),
            customer.name.clone(),
            customer.email.clone(),
            customer.phone.clone(),
            customer.address.clone(),
            customer.age.to_string(),
            customer.interests.clone().unwrap_or_default(),
            customer.feelings.clone().unwrap_or_default(),
            customer.values.clone().unwrap_or_default(),
            customer.other_info.clone().unwrap_or_default(),
            customer.status_label().to_string(),
            customer.created_at.format("%d/%m/%Y").to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|err| ServiceError::Internal(format!("csv: {err}")))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::customer::Customer;
    use crate::domain::query::FilterBucket;
    use crate::domain::types::CustomerId;

    #[test]
    fn csv_has_header_and_one_line_per_customer() {
        let created_at = NaiveDate::from_ymd_opt(2025, 3, 9)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let report = ReportData {
            customers: vec![Customer {
                id: CustomerId::new(1).unwrap(),
                name: "Silva, Ana".to_string(),
                email: "ana@example.com".to_string(),
                phone: "11".to_string(),
                address: "Rua A".to_string(),
                age: 30,
                interests: None,
                feelings: None,
                values: None,
                other_info: None,
                active: true,
                reviewed: true,
                created_at,
            }],
            total_count: 1,
            filter: FilterBucket::All,
            search: None,
            generated_at: created_at,
        };

        let csv = String::from_utf8(export_csv(&report).unwrap()).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("id,nome,email"));
        assert_eq!(
            lines[1],
            "1,\"Silva, Ana\",ana@example.com,11,Rua A,30,,,,,Ativo,09/03/2025"
        );
    }
}
