//! Email subjects and bodies.
//!
//! Bodies are Tera templates rendered without autoescaping since mail is
//! sent as plain text. Each default can be replaced at runtime through the
//! matching configuration key.

use chrono::NaiveDate;
use serde::Serialize;
use tera::{Context, Tera};

use crate::domain::client::Client;
use crate::domain::event::{Event, EventSummary};
use crate::notifications::{AgendaEntry, NotificationError, format_date};

pub const DEFAULT_PROPOSAL_TEMPLATE: &str = "Prezado(a) {{ client_name }},

Segue em anexo a proposta para o seu evento:

Data: {{ date }}
Horário: {{ time }}
Local: {{ venue }}
Quantidade de Pessoas: {{ headcount }}
Total: {{ total }}

{{ message | default(value=\"Ficamos à disposição para quaisquer esclarecimentos.\") }}

Atenciosamente,
{{ venue_name }}";

pub const DEFAULT_UPDATE_TEMPLATE: &str = "Prezado(a) {{ client_name }},

Informamos que houve uma atualização na reserva do seu evento:

Data: {{ date }}
Horário: {{ time }}
Local: {{ venue }}
Quantidade de Pessoas: {{ headcount }}
Total: {{ total }}

{{ message | default(value=\"Segue em anexo a proposta atualizada.\") }}

Atenciosamente,
{{ venue_name }}";

pub const DEFAULT_REMINDER_TEMPLATE: &str = "Prezado(a) {{ client_name }},

Este é um lembrete sobre o seu evento agendado para daqui a 7 dias:

Data: {{ date }}
Horário: {{ time }}
Local: {{ venue }}
Quantidade de Pessoas: {{ headcount }}
{% if drinks_package -%}
Pacote de bebidas contratado: {{ drinks_price }} por pessoa
{% else -%}
Lembramos que os vinhos e bebidas não estão incluídos no valor do menu.
{% endif -%}
Total: {{ total }}

Estamos aguardando você!

Atenciosamente,
{{ venue_name }}";

pub const DEFAULT_AGENDA_TEMPLATE: &str = "{% if intro %}{{ intro }}

{% endif %}Agenda do dia {{ date }}

{% if entries | length == 0 -%}
Nenhum evento agendado para este dia.
{% else -%}
Eventos:

{% for entry in entries -%}
{{ entry.time }} - {{ entry.client_name }}
  Tipo: {{ entry.event_type }}
  Local: {{ entry.venue }}
  Status: {{ entry.status }}
  Pessoas: {{ entry.headcount }}
  Total: {{ entry.total }}

{% endfor %}
--- Resumo ---
Eventos em análise: {{ under_review }}
Eventos confirmados: {{ confirmed }}
Eventos cancelados: {{ cancelled }}

Total (não cancelados): {{ revenue }}
{% endif %}";

pub fn proposal_subject(date: NaiveDate) -> String {
    format!("Proposta de Evento - {}", format_date(date))
}

pub fn update_subject(date: NaiveDate) -> String {
    format!("Atualização de Reserva - {}", format_date(date))
}

pub fn reminder_subject(date: NaiveDate) -> String {
    format!("Lembrete: Seu evento em {}", format_date(date))
}

pub fn agenda_subject(date: NaiveDate) -> String {
    format!("Agenda do Dia - {}", format_date(date))
}

pub fn render(template: &str, context: &Context) -> Result<String, NotificationError> {
    Ok(Tera::one_off(template, context, false)?)
}

/// Variables available to proposal, update and reminder templates.
pub fn event_context(
    venue_name: &str,
    event: &Event,
    client: &Client,
    message: Option<&str>,
) -> Context {
    let mut context = Context::new();
    context.insert("venue_name", venue_name);
    context.insert("client_name", client.full_name.as_str());
    context.insert("client", client);
    context.insert("event", event);
    context.insert("event_type", event.event_type.as_str());
    context.insert("date", &format_date(event.event_date));
    context.insert("time", &event.event_time.to_string());
    context.insert("venue", event.venue.label());
    context.insert("status", event.status.label());
    context.insert("headcount", &event.headcount);
    context.insert("drinks_package", &event.drinks_package);
    context.insert("drinks_price", &event.drinks_price_per_person.format_brl());
    context.insert("total", &event.pricing.total.format_brl());
    if let Some(message) = message.map(str::trim).filter(|m| !m.is_empty()) {
        context.insert("message", message);
    }
    context
}

#[derive(Serialize)]
struct AgendaLine<'a> {
    time: String,
    client_name: &'a str,
    event_type: &'a str,
    venue: &'static str,
    status: &'static str,
    headcount: i32,
    total: String,
}

/// Variables available to the daily agenda template.
pub fn agenda_context(
    date: NaiveDate,
    entries: &[AgendaEntry],
    summary: &EventSummary,
    intro: Option<&str>,
) -> Context {
    let lines = entries
        .iter()
        .map(|AgendaEntry { event, client }| AgendaLine {
            time: event.event_time.to_string(),
            client_name: client.full_name.as_str(),
            event_type: event.event_type.as_str(),
            venue: event.venue.label(),
            status: event.status.label(),
            headcount: event.headcount,
            total: event.pricing.total.format_brl(),
        })
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("date", &format_date(date));
    context.insert("entries", &lines);
    context.insert("under_review", &summary.under_review);
    context.insert("confirmed", &summary.confirmed);
    context.insert("cancelled", &summary.cancelled);
    context.insert("revenue", &summary.revenue.format_brl());
    context.insert("intro", &intro.map(str::trim).unwrap_or_default());
    context
}
