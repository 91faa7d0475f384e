//! Plain-text rendering of calendar pages and notes.

use daybook_core::{CalendarDay, CalendarPage, NoteRecord};
use std::fmt::{self, Display, Formatter};

const WEEKDAY_HEADER: &str = " Mo   Tu   We   Th   Fr   Sa   Su";
const CELL_WIDTH: usize = 5;

/// Month grid, one line per week. Today is bracketed, note days get `*`.
pub struct MonthView<'a>(pub &'a CalendarPage);

impl Display for MonthView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let page = self.0;
        let title = page.month.first_day.format("%B %Y").to_string();
        writeln!(f, "{title:^width$}", width = CELL_WIDTH * 7)?;
        writeln!(f, "{WEEKDAY_HEADER}")?;

        for week in &page.month.weeks {
            let line: String = week.days.iter().map(render_cell).collect();
            writeln!(f, "{}", line.trim_end())?;
        }

        write!(
            f,
            "prev: {:04}-{:02}  next: {:04}-{:02}",
            page.previous.year, page.previous.month, page.next.year, page.next.month
        )
    }
}

fn render_cell(day: &CalendarDay) -> String {
    match day.day_number {
        None => " ".repeat(CELL_WIDTH),
        Some(number) => {
            let (open, close) = if day.is_today { ('[', ']') } else { (' ', ' ') };
            let mark = if day.has_notes { '*' } else { ' ' };
            format!("{open}{number:>2}{close}{mark}")
        }
    }
}

/// One-line summary used by list views.
pub struct NoteLine<'a>(pub &'a NoteRecord);

impl Display for NoteLine<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let note = self.0;
        let date = note
            .note_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "----------".to_string());
        let preview = note.preview_text.as_deref().unwrap_or("");
        let line = format!("{}  {date}  {}  {preview}", note.id, note.title);
        f.write_str(line.trim_end())
    }
}

/// Full note view.
pub struct NoteDetail<'a>(pub &'a NoteRecord);

impl Display for NoteDetail<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let note = self.0;
        writeln!(f, "id:    {}", note.id)?;
        writeln!(f, "title: {}", note.title)?;
        if let Some(date) = note.note_date {
            writeln!(f, "date:  {date}")?;
        }
        writeln!(f)?;
        f.write_str(&note.content)
    }
}

#[cfg(test)]
mod tests {
    use super::{MonthView, NoteDetail, NoteLine};
    use chrono::NaiveDate;
    use daybook_core::{build_calendar_page, NoteRecord, YearMonth};
    use std::collections::BTreeSet;
    use uuid::Uuid;

    #[test]
    fn month_grid_marks_today_and_note_days() {
        let note_days: BTreeSet<u32> = [1, 17].into_iter().collect();
        let today = NaiveDate::from_ymd_opt(2024, 9, 17).unwrap();
        let page = build_calendar_page(YearMonth::new(2024, 9).unwrap(), today, &note_days);

        let text = MonthView(&page).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0].trim(), "September 2024");
        // September 2024 starts on a Sunday.
        assert_eq!(lines[2].trim_start(), "1 *");
        assert!(lines.iter().any(|line| line.contains("[17]*")));
        assert_eq!(*lines.last().unwrap(), "prev: 2024-08  next: 2024-10");
        assert_eq!(lines.len(), 2 + page.month.weeks.len() + 1);
    }

    fn record(note_date: Option<NaiveDate>, preview: Option<&str>) -> NoteRecord {
        NoteRecord {
            id: Uuid::nil(),
            owner_id: Uuid::nil(),
            title: "Plan".to_string(),
            content: "line one\nline two".to_string(),
            preview_text: preview.map(str::to_string),
            note_date,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn note_line_shows_placeholder_date_and_trims() {
        let line = NoteLine(&record(None, None)).to_string();
        assert_eq!(line, "00000000-0000-0000-0000-000000000000  ----------  Plan");
    }

    #[test]
    fn note_detail_lists_date_only_when_present() {
        let dated = record(NaiveDate::from_ymd_opt(2024, 2, 29), Some("line one"));
        let text = NoteDetail(&dated).to_string();
        assert!(text.contains("date:  2024-02-29\n"));
        assert!(text.ends_with("\nline one\nline two"));

        let undated = NoteDetail(&record(None, None)).to_string();
        assert!(!undated.contains("date:"));
    }
}
