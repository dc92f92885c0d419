//! Proposal, update and reminder emails plus the daily agenda.
//!
//! Every proposal, update and reminder attempt is written to the send
//! history of its event, successful or not. A failed delivery is reported to
//! the caller after it has been recorded and never undoes earlier writes.

use chrono::{Days, NaiveDate};
use validator::Validate;

use crate::domain::client::Client;
use crate::domain::email_history::{EmailKind, EmailRecord, NewEmailRecord};
use crate::domain::event::{Event, EventStatus, EventSummary};
use crate::domain::settings::{
    AGENDA_MESSAGE, AGENDA_RECIPIENTS, AGENDA_SUBJECT, PROPOSAL_TEMPLATE, REMINDER_TEMPLATE,
    UPDATE_TEMPLATE, parse_recipients,
};
use crate::domain::types::EventId;
use crate::dto::notifications::{AgendaDispatch, ReminderSummary};
use crate::forms::FormError;
use crate::forms::notifications::{SendAgendaForm, SendEventEmailForm};
use crate::models::auth::AuthenticatedUser;
use crate::notifications::mailer::{Attachment, Mailer, OutgoingEmail};
use crate::notifications::pdf::{ProposalContent, render_agenda, render_proposal};
use crate::notifications::spreadsheet::render_agenda_csv;
use crate::notifications::templates::{self, event_context};
use crate::notifications::{NotificationError, file_date};
use crate::repository::{
    ClientReader, EventListQuery, EventReader, EventWriter, MenuReader, SettingsReader,
};
use crate::services::clients::load_client;
use crate::services::events::{load_event, load_snapshot, load_wine_lines};
use crate::services::menus::load_menu;
use crate::services::reports::with_clients;
use crate::services::settings::setting_value;
use crate::services::{ServiceError, ServiceResult, ensure_role};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Days between a reminder and its event.
pub const REMINDER_LEAD_DAYS: u64 = 7;

/// Transport and letterhead shared by every notification.
#[derive(Clone, Copy)]
pub struct MailContext<'a> {
    pub mailer: &'a dyn Mailer,
    pub venue_name: &'a str,
}

/// Anything the notification services read from storage.
pub trait NotificationStore:
    EventReader + EventWriter + ClientReader + MenuReader + SettingsReader
{
}

impl<T> NotificationStore for T where
    T: EventReader + EventWriter + ClientReader + MenuReader + SettingsReader + ?Sized
{
}

fn proposal_filename(event_id: EventId) -> String {
    format!("proposta-evento-{event_id}.pdf")
}

/// Renders the proposal PDF of an event.
fn proposal_attachment<R>(
    repo: &R,
    event: &Event,
    client: &Client,
    venue_name: &str,
) -> ServiceResult<Attachment>
where
    R: NotificationStore + ?Sized,
{
    let menu = load_menu(repo, event.menu_id)?;
    let dishes = load_snapshot(repo, event.id)?;
    let wines = load_wine_lines(repo, event.id)?;

    let content = render_proposal(&ProposalContent {
        venue_name,
        event,
        client,
        menu: &menu,
        dishes: &dishes,
        wines: &wines,
    });
    Ok(Attachment::pdf(proposal_filename(event.id), content))
}

/// Proposal PDF for download.
pub fn proposal_document<R>(
    event_id: i32,
    venue_name: &str,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Attachment>
where
    R: NotificationStore + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let event = load_event(repo, EventId::new(event_id)?)?;
    let client = load_client(repo, event.client_id)?;
    proposal_attachment(repo, &event, &client, venue_name)
}

fn template_for<R>(repo: &R, kind: EmailKind) -> ServiceResult<String>
where
    R: SettingsReader + ?Sized,
{
    let (key, default) = match kind {
        EmailKind::Proposal => (PROPOSAL_TEMPLATE, templates::DEFAULT_PROPOSAL_TEMPLATE),
        EmailKind::Update => (UPDATE_TEMPLATE, templates::DEFAULT_UPDATE_TEMPLATE),
        EmailKind::Reminder => (REMINDER_TEMPLATE, templates::DEFAULT_REMINDER_TEMPLATE),
    };
    Ok(setting_value(repo, key)?.unwrap_or_else(|| default.to_string()))
}

fn subject_for(kind: EmailKind, date: NaiveDate) -> String {
    match kind {
        EmailKind::Proposal => templates::proposal_subject(date),
        EmailKind::Update => templates::update_subject(date),
        EmailKind::Reminder => templates::reminder_subject(date),
    }
}

/// Renders, sends and records one email about an event.
///
/// Fails with a validation error, before anything is recorded, when the
/// client has no email address.
pub(crate) fn deliver_event_email<R>(
    kind: EmailKind,
    event_id: EventId,
    message: Option<&str>,
    repo: &R,
    ctx: MailContext<'_>,
) -> ServiceResult<EmailRecord>
where
    R: NotificationStore + ?Sized,
{
    let event = load_event(repo, event_id)?;
    let client = load_client(repo, event.client_id)?;
    let Some(recipient) = client.email.as_ref().map(|e| e.as_str().to_string()) else {
        return Err(ServiceError::Validation("client has no email address".into()));
    };

    let attachments = match kind {
        EmailKind::Reminder => Vec::new(),
        EmailKind::Proposal | EmailKind::Update => {
            vec![proposal_attachment(repo, &event, &client, ctx.venue_name)?]
        }
    };
    let template = template_for(repo, kind)?;
    let subject = subject_for(kind, event.event_date);

    let rendered = templates::render(
        &template,
        &event_context(ctx.venue_name, &event, &client, message),
    );
    let body = match &rendered {
        Ok(body) => body.clone(),
        Err(_) => message.unwrap_or_default().to_string(),
    };
    let outcome: Result<(), NotificationError> = rendered.and_then(|body| {
        ctx.mailer.send(&OutgoingEmail {
            recipients: vec![recipient.clone()],
            subject: subject.clone(),
            body,
            attachments,
        })
    });

    let mut record = NewEmailRecord::sent(event.id, kind, recipient, subject, body);
    if let Err(err) = &outcome {
        log::warn!("Failed to send {kind} email for event {}: {err}", event.id);
        record = record.failed(err.to_string());
    }
    let stored = repo.record_email(&record).map_err(|err| {
        log::error!("Failed to record {kind} email for event {}: {err}", event.id);
        err
    })?;

    outcome?;
    log::info!("Sent {kind} email for event {} to {}", event.id, stored.recipient);
    Ok(stored)
}

fn send_event_email<R>(
    kind: EmailKind,
    event_id: i32,
    form: SendEventEmailForm,
    user: &AuthenticatedUser,
    repo: &R,
    ctx: MailContext<'_>,
) -> ServiceResult<EmailRecord>
where
    R: NotificationStore + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let event_id = EventId::new(event_id)?;
    let message = form.into_message()?;
    deliver_event_email(kind, event_id, message.as_deref(), repo, ctx)
}

/// Emails the proposal PDF to the client.
pub fn send_proposal<R>(
    event_id: i32,
    form: SendEventEmailForm,
    user: &AuthenticatedUser,
    repo: &R,
    ctx: MailContext<'_>,
) -> ServiceResult<EmailRecord>
where
    R: NotificationStore + ?Sized,
{
    send_event_email(EmailKind::Proposal, event_id, form, user, repo, ctx)
}

/// Emails the updated proposal PDF to the client.
pub fn send_update<R>(
    event_id: i32,
    form: SendEventEmailForm,
    user: &AuthenticatedUser,
    repo: &R,
    ctx: MailContext<'_>,
) -> ServiceResult<EmailRecord>
where
    R: NotificationStore + ?Sized,
{
    send_event_email(EmailKind::Update, event_id, form, user, repo, ctx)
}

/// Sends reminders for confirmed events exactly a week after `today`.
///
/// Each event is handled on its own; a failure is logged, recorded in the
/// send history and counted, and the sweep goes on.
pub fn send_due_reminders<R>(
    today: NaiveDate,
    repo: &R,
    ctx: MailContext<'_>,
) -> ServiceResult<ReminderSummary>
where
    R: NotificationStore + ?Sized,
{
    let Some(target) = today.checked_add_days(Days::new(REMINDER_LEAD_DAYS)) else {
        return Err(ServiceError::Validation(format!("invalid date: {today}")));
    };
    let due = repo
        .list_events(
            EventListQuery::new()
                .on(target)
                .status(EventStatus::Confirmed)
                .reminder_enabled(true),
        )
        .map_err(|err| {
            log::error!("Failed to list events due for a reminder: {err}");
            err
        })?;

    let mut summary = ReminderSummary::default();
    for event in due {
        match deliver_event_email(EmailKind::Reminder, event.id, None, repo, ctx) {
            Ok(_) => summary.sent += 1,
            Err(ServiceError::Validation(reason)) => {
                log::warn!("Skipped reminder for event {}: {reason}", event.id);
                summary.skipped += 1;
            }
            Err(err) => {
                log::warn!("Reminder for event {} failed: {err}", event.id);
                summary.failed += 1;
            }
        }
    }

    log::info!(
        "Reminders for {target}: {} sent, {} failed, {} skipped",
        summary.sent,
        summary.failed,
        summary.skipped
    );
    Ok(summary)
}

/// Mails the agenda of `date`, as text with PDF and CSV attachments.
///
/// Without explicit `recipients` the `agenda_recipients` setting is used.
pub fn send_daily_agenda<R>(
    date: NaiveDate,
    recipients: Option<Vec<String>>,
    repo: &R,
    ctx: MailContext<'_>,
) -> ServiceResult<AgendaDispatch>
where
    R: NotificationStore + ?Sized,
{
    let recipients: Vec<String> = match recipients {
        Some(given) => given
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect(),
        None => setting_value(repo, AGENDA_RECIPIENTS)?
            .map(|value| parse_recipients(&value))
            .unwrap_or_default(),
    };
    if recipients.is_empty() {
        return Err(ServiceError::Validation(
            "Nenhum destinatário configurado para a agenda diária".into(),
        ));
    }

    let events = repo
        .list_events(EventListQuery::new().on(date))
        .map_err(|err| {
            log::error!("Failed to list events of {date}: {err}");
            err
        })?;
    let total_events = events.len();
    let entries = with_clients(repo, events)?;
    let summary = EventSummary::from_events(entries.iter().map(|entry| &entry.event));

    let subject =
        setting_value(repo, AGENDA_SUBJECT)?.unwrap_or_else(|| templates::agenda_subject(date));
    let intro = setting_value(repo, AGENDA_MESSAGE)?;
    let body = templates::render(
        templates::DEFAULT_AGENDA_TEMPLATE,
        &templates::agenda_context(date, &entries, &summary, intro.as_deref()),
    )?;

    let stamp = file_date(date);
    let attachments = vec![
        Attachment::pdf(
            format!("agenda-{stamp}.pdf"),
            render_agenda(ctx.venue_name, date, &entries, &summary),
        ),
        Attachment::csv(format!("agenda-{stamp}.csv"), render_agenda_csv(&entries)?),
    ];

    ctx.mailer
        .send(&OutgoingEmail {
            recipients: recipients.clone(),
            subject,
            body,
            attachments,
        })
        .map_err(|err| {
            log::error!("Failed to send the agenda of {date}: {err}");
            err
        })?;

    log::info!(
        "Sent agenda of {date} with {total_events} event(s) to {} recipient(s)",
        recipients.len()
    );
    Ok(AgendaDispatch {
        date,
        total_events,
        recipients,
    })
}

/// Reminder sweep triggered over the API.
pub fn trigger_reminders<R>(
    today: NaiveDate,
    user: &AuthenticatedUser,
    repo: &R,
    ctx: MailContext<'_>,
) -> ServiceResult<ReminderSummary>
where
    R: NotificationStore + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    send_due_reminders(today, repo, ctx)
}

/// Daily agenda triggered over the API.
pub fn trigger_daily_agenda<R>(
    form: SendAgendaForm,
    user: &AuthenticatedUser,
    repo: &R,
    ctx: MailContext<'_>,
) -> ServiceResult<AgendaDispatch>
where
    R: NotificationStore + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    form.validate().map_err(FormError::from)?;
    send_daily_agenda(form.date, form.recipients, repo, ctx)
}
