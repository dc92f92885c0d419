//! CSV exports of the agenda and the event report.

use csv::WriterBuilder;

use crate::notifications::{AgendaEntry, NotificationError, format_date};

const AGENDA_HEADER: [&str; 7] = [
    "Horário",
    "Cliente",
    "Tipo",
    "Local",
    "Status",
    "Quantidade de Pessoas",
    "Total (R$)",
];

fn write_rows<const N: usize>(
    header: [&str; N],
    rows: impl Iterator<Item = [String; N]>,
) -> Result<Vec<u8>, NotificationError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer
        .into_inner()
        .map_err(|err| NotificationError::Document(err.to_string()))
}

/// One line per event of the day, in the order given.
pub fn render_agenda_csv(entries: &[AgendaEntry]) -> Result<Vec<u8>, NotificationError> {
    write_rows(
        AGENDA_HEADER,
        entries.iter().map(|AgendaEntry { event, client }| {
            [
                event.event_time.to_string(),
                client.full_name.to_string(),
                event.event_type.to_string(),
                event.venue.label().to_string(),
                event.status.label().to_string(),
                event.headcount.to_string(),
                event.pricing.total.to_plain_string(),
            ]
        }),
    )
}

/// Event report over an arbitrary range; like the agenda with a date column.
pub fn render_report_csv(entries: &[AgendaEntry]) -> Result<Vec<u8>, NotificationError> {
    let mut header = ["Data"; 8];
    header[1..].copy_from_slice(&AGENDA_HEADER);

    write_rows(
        header,
        entries.iter().map(|AgendaEntry { event, client }| {
            [
                format_date(event.event_date),
                event.event_time.to_string(),
                client.full_name.to_string(),
                event.event_type.to_string(),
                event.venue.label().to_string(),
                event.status.label().to_string(),
                event.headcount.to_string(),
                event.pricing.total.to_plain_string(),
            ]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::{EventStatus, Venue};
    use crate::domain::fixtures::{client, event_at};

    fn entries() -> Vec<AgendaEntry> {
        vec![
            AgendaEntry {
                event: event_at(1, "12:00", Venue::HallA, EventStatus::Confirmed),
                client: client(1, "Ana Souza, Jr.", "11999990000", None),
            },
            AgendaEntry {
                event: event_at(2, "19:30", Venue::HallB, EventStatus::Cancelled),
                client: client(2, "Bruno Lima", "11888880000", None),
            },
        ]
    }

    #[test]
    fn agenda_csv_has_header_and_quoted_names() {
        let csv = String::from_utf8(render_agenda_csv(&entries()).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Horário,Cliente,Tipo,Local,Status,Quantidade de Pessoas,Total (R$)"
        );
        assert_eq!(
            lines[1],
            "12:00,\"Ana Souza, Jr.\",Casamento,Salão de Eventos,Confirmado,50,7425.00"
        );
        assert_eq!(
            lines[2],
            "19:30,Bruno Lima,Casamento,Salão Principal,Cancelado,50,7425.00"
        );
    }

    #[test]
    fn report_csv_starts_with_the_date() {
        let csv = String::from_utf8(render_report_csv(&entries()).unwrap()).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("Data,Horário,Cliente,Tipo,Local,Status,Quantidade de Pessoas,Total (R$)")
        );
        assert!(lines.next().unwrap().starts_with("15/03/2025,12:00,"));
    }
}
