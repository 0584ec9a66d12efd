//! Plain-text rendering of aggregates and listings.

use std::collections::BTreeMap;
use vacancy_core::VacancyRecord;
use vacancy_stats::{AggregateResult, CityStat};

/// Key-value summary of every year and city map.
///
/// Salary means are shown truncated to whole rubles; shares keep their
/// rounded fraction.
pub fn render_summary(result: &AggregateResult) -> String {
    let profession = result.profession();
    let mut out = String::new();

    push_line(&mut out, "Salary by year", year_entries(&result.mean_salary_by_year(), whole));
    push_line(
        &mut out,
        "Vacancies by year",
        year_entries(result.count_by_year(), u64::to_string),
    );
    push_line(
        &mut out,
        &format!("Salary by year for '{profession}'"),
        year_entries(&result.mean_filtered_salary_by_year(), whole),
    );
    push_line(
        &mut out,
        &format!("Vacancies by year for '{profession}'"),
        year_entries(result.filtered_count_by_year(), u64::to_string),
    );
    push_line(
        &mut out,
        "Top salary by city",
        city_entries(result.salary_by_city(), whole),
    );
    push_line(
        &mut out,
        "Top vacancy share by city",
        city_entries(result.share_by_city(), f64::to_string),
    );
    out
}

/// Salary mean truncated toward zero.
fn whole(mean: &f64) -> String {
    (mean.trunc() as i64).to_string()
}

fn year_entries<V>(map: &BTreeMap<i32, V>, fmt: impl Fn(&V) -> String) -> Vec<String> {
    map.iter().map(|(year, value)| format!("{year}: {}", fmt(value))).collect()
}

fn city_entries(stats: &[CityStat], fmt: impl Fn(&f64) -> String) -> Vec<String> {
    stats
        .iter()
        .map(|s| format!("'{}': {}", s.city, fmt(&s.value)))
        .collect()
}

fn push_line(out: &mut String, label: &str, entries: Vec<String>) {
    out.push_str(&format!("{label}: {{{}}}\n", entries.join(", ")));
}

/// Numbered listing rows, or `Nothing found` when empty.
pub fn render_listing(rows: &[(usize, VacancyRecord)]) -> String {
    if rows.is_empty() {
        return "Nothing found\n".to_string();
    }

    let mut out = String::new();
    for (number, record) in rows {
        let published = record
            .published_date()
            .map(|d| d.format("%d.%m.%Y").to_string())
            .unwrap_or_else(|| record.published_at.clone());
        out.push_str(&format!(
            "{number}. {} | {} - {} ({}) | {} | {published}\n",
            record.name,
            group_thousands(record.salary.from),
            group_thousands(record.salary.to),
            record.salary.currency,
            record.area_name,
        ));
    }
    out
}

/// Whole part of `amount` with space-separated thousands.
fn group_thousands(amount: f64) -> String {
    let digits = format!("{}", amount.trunc().abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    if amount < 0.0 {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use vacancy_core::{Config, ProfessionFilter, SalaryRange};
    use vacancy_stats::aggregate;

    fn make_record(name: &str, from: f64, to: f64, area: &str, published_at: &str) -> VacancyRecord {
        VacancyRecord {
            name: name.to_string(),
            salary: SalaryRange::new(from, to, "RUR"),
            area_name: area.to_string(),
            published_at: published_at.to_string(),
        }
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1000.0), "1 000");
        assert_eq!(group_thousands(1234567.9), "1 234 567");
    }

    #[test]
    fn test_render_summary() {
        let mut config = Config::default();
        config.stats.profession = ProfessionFilter::new("Analyst");
        let records = vec![
            make_record("Data Analyst", 100.0, 100.0, "Москва", "2022-01-01"),
            make_record("Developer", 300.0, 300.0, "Москва", "2022-01-01"),
        ];
        let summary = render_summary(&aggregate(&records, &config).unwrap());
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines[0], "Salary by year: {2022: 200}");
        assert_eq!(lines[1], "Vacancies by year: {2022: 2}");
        assert_eq!(lines[2], "Salary by year for 'Analyst': {2022: 100}");
        assert_eq!(lines[3], "Vacancies by year for 'Analyst': {2022: 1}");
        assert_eq!(lines[4], "Top salary by city: {'Москва': 200}");
        assert_eq!(lines[5], "Top vacancy share by city: {'Москва': 1}");
    }

    #[test]
    fn test_render_summary_truncates_means() {
        let mut config = Config::default();
        config.stats.profession = ProfessionFilter::new("Analyst");
        let records = vec![
            make_record("Analyst", 100.0, 100.0, "Омск", "2021-01-01"),
            make_record("Analyst", 100.0, 100.0, "Омск", "2021-01-01"),
            make_record("Analyst", 101.0, 101.0, "Омск", "2021-01-01"),
            make_record("Developer", 100.0, 100.0, "Пермь", "2021-01-01"),
            make_record("Developer", 100.0, 100.0, "Пермь", "2021-01-01"),
            make_record("Developer", 100.0, 100.0, "Пермь", "2021-01-01"),
        ];
        let result = aggregate(&records, &config).unwrap();
        assert!(result.mean_filtered_salary_by_year()[&2021] > 100.3);

        let summary = render_summary(&result);
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines[0], "Salary by year: {2021: 100}");
        assert_eq!(lines[2], "Salary by year for 'Analyst': {2021: 100}");
        assert_eq!(lines[4], "Top salary by city: {'Омск': 100, 'Пермь': 100}");
        assert_eq!(lines[5], "Top vacancy share by city: {'Омск': 0.5, 'Пермь': 0.5}");
    }

    #[test]
    fn test_render_listing() {
        let rows = vec![(
            3,
            make_record("Программист", 100000.0, 150000.0, "Москва", "2022-07-05T18:19:30+0300"),
        )];
        assert_eq!(
            render_listing(&rows),
            "3. Программист | 100 000 - 150 000 (RUR) | Москва | 05.07.2022\n"
        );
        assert_eq!(render_listing(&[]), "Nothing found\n");
    }
}
