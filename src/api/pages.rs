//! Server-rendered HTML pages.
//!
//! Every piece of user-supplied text goes through [`text`] or [`attr`] before
//! it reaches the output.

use axum::response::Html;
use chrono::{DateTime, Local, Utc};
use std::fmt::Write as _;

use super::flash::Flash;
use crate::domain::{CurrentUser, DashboardQuery, DateScope, Destination, FeedbackId};
use crate::models::feedback::{Feedback, FeedbackInput, FeedbackThread};
use crate::models::user::Registration;

fn text(value: &str) -> String {
    html_escape::encode_text(value).into_owned()
}

fn attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn nav(user: &CurrentUser) -> String {
    let mut links = String::from(r#"<a href="/">Home</a>"#);

    match user {
        CurrentUser::Anonymous => {
            links.push_str(r#" <a href="/login/">Log in</a> <a href="/register/">Register</a>"#);
        }
        CurrentUser::Authenticated(session_user) => {
            if user.is_staff() {
                links.push_str(r#" <a href="/dashboard">Dashboard</a>"#);
            } else {
                links.push_str(
                    r#" <a href="/feedback_form">Leave feedback</a> <a href="/my/feedback/">My feedback</a>"#,
                );
            }
            let _ = write!(
                links,
                r#" <span class="whoami">{}</span> <form method="post" action="/logout/" class="inline"><button type="submit">Log out</button></form>"#,
                text(&session_user.username)
            );
        }
    }

    links
}

fn layout(user: &CurrentUser, flashes: &[Flash], title: &str, body: &str) -> Html<String> {
    let mut messages = String::new();
    for flash in flashes {
        let _ = write!(
            messages,
            r#"<p class="{}">{}</p>"#,
            flash.level.css_class(),
            text(&flash.message)
        );
    }

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Feedback Portal</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<nav>{nav}</nav>
<main>
{messages}
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = text(title),
        nav = nav(user),
    ))
}

fn error_list(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut out = String::from(r#"<ul class="errors">"#);
    for error in errors {
        let _ = write!(out, "<li>{}</li>", text(error));
    }
    out.push_str("</ul>");
    out
}

fn feedback_fields(input: &FeedbackInput) -> String {
    format!(
        r#"<label>Name <input type="text" name="name" maxlength="100" value="{name}"></label>
<label>Email <input type="email" name="email" value="{email}"></label>
<label>Message <textarea name="message" rows="6" required>{message}</textarea></label>"#,
        name = attr(&input.name),
        email = attr(&input.email),
        message = text(&input.message),
    )
}

fn replies_html(thread: &FeedbackThread) -> String {
    if thread.replies.is_empty() {
        return String::new();
    }
    let mut out = String::from(r#"<ul class="replies">"#);
    for reply in &thread.replies {
        let _ = write!(
            out,
            r#"<li><span class="meta">{} replied {}</span><p>{}</p></li>"#,
            text(reply.admin_name.as_deref().unwrap_or("Staff")),
            timestamp(&reply.created_at),
            text(&reply.message)
        );
    }
    out.push_str("</ul>");
    out
}

fn feedback_card(feedback: &Feedback, actions: &str) -> String {
    format!(
        r#"<article class="feedback" id="feedback-{id}">
<header><strong>{name}</strong> <span class="meta">{email} &middot; {created}</span></header>
<p>{message}</p>
{actions}"#,
        id = feedback.id,
        name = text(&feedback.name),
        email = text(&feedback.email),
        created = timestamp(&feedback.created_at),
        message = text(&feedback.message),
    )
}

pub fn home(user: &CurrentUser, flashes: &[Flash]) -> Html<String> {
    let body = match user {
        CurrentUser::Anonymous => {
            r#"<p>Tell us what you think. <a href="/login/">Log in</a> or <a href="/register/">create an account</a> to leave feedback.</p>"#
                .to_string()
        }
        CurrentUser::Authenticated(session_user) => format!(
            r#"<p>Welcome back, {}.</p><p><a href="/feedback_form">Leave feedback</a> or review <a href="/my/feedback/">your submissions</a>.</p>"#,
            text(&session_user.username)
        ),
    };
    layout(user, flashes, "Feedback Portal", &body)
}

pub fn register(flashes: &[Flash], form: &Registration, errors: &[String]) -> Html<String> {
    let body = format!(
        r#"{errors}
<form method="post" action="/register/">
<label>Username <input type="text" name="username" maxlength="150" value="{username}" required></label>
<label>Email <input type="email" name="email" value="{email}" required></label>
<label>Password <input type="password" name="password" required></label>
<label>Confirm password <input type="password" name="confirm_password" required></label>
<button type="submit">Register</button>
</form>
<p>Already registered? <a href="/login/">Log in</a>.</p>"#,
        errors = error_list(errors),
        username = attr(&form.username),
        email = attr(&form.email),
    );
    layout(&CurrentUser::Anonymous, flashes, "Register", &body)
}

pub fn login(flashes: &[Flash], username: &str, error: Option<&str>) -> Html<String> {
    let errors: Vec<String> = error.map(str::to_string).into_iter().collect();
    let body = format!(
        r#"{errors}
<form method="post" action="/login/">
<label>Username <input type="text" name="username" value="{username}" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Log in</button>
</form>
<p>No account yet? <a href="/register/">Register</a>.</p>"#,
        errors = error_list(&errors),
        username = attr(username),
    );
    layout(&CurrentUser::Anonymous, flashes, "Log in", &body)
}

pub fn feedback_form(user: &CurrentUser, flashes: &[Flash], input: &FeedbackInput) -> Html<String> {
    let body = format!(
        r#"<form method="post" action="/feedback/submit">
{fields}
<button type="submit">Send feedback</button>
</form>"#,
        fields = feedback_fields(input),
    );
    layout(user, flashes, "Leave feedback", &body)
}

pub fn my_feedback(
    user: &CurrentUser,
    flashes: &[Flash],
    threads: &[FeedbackThread],
) -> Html<String> {
    let mut body = String::new();
    if threads.is_empty() {
        body.push_str(
            r#"<p class="empty">You have not left any feedback yet. <a href="/feedback_form">Leave some</a>.</p>"#,
        );
    }
    for thread in threads {
        let id = thread.feedback.id;
        let actions = format!(
            r#"<p class="actions"><a href="/update/feedback/{id}/">Edit</a> <a href="/delete/feedback/{id}/?next=my_feedback">Delete</a></p>
{replies}</article>"#,
            replies = replies_html(thread),
        );
        body.push_str(&feedback_card(&thread.feedback, &actions));
    }
    layout(user, flashes, "My feedback", &body)
}

pub fn dashboard(
    user: &CurrentUser,
    flashes: &[Flash],
    query: &DashboardQuery,
    threads: &[FeedbackThread],
) -> Html<String> {
    let scope = query.date_scope();
    let option = |value: &str, label: &str, selected: bool| {
        format!(
            r#"<option value="{value}"{}>{label}</option>"#,
            if selected { " selected" } else { "" }
        )
    };

    let mut body = format!(
        r#"<form method="get" action="/dashboard" class="filters">
<input type="search" name="q" placeholder="Search name, email or message" value="{q}">
<select name="date">{any}{today}{week}</select>
<button type="submit">Filter</button>
</form>
<p class="meta">{count} result(s)</p>"#,
        q = attr(query.search_text()),
        any = option("", "Any time", scope.is_none()),
        today = option(
            DateScope::Today.as_str(),
            "Today",
            scope == Some(DateScope::Today)
        ),
        week = option(
            DateScope::Week.as_str(),
            "Last 7 days",
            scope == Some(DateScope::Week)
        ),
        count = threads.len(),
    );

    for thread in threads {
        let id = thread.feedback.id;
        let actions = format!(
            r#"<p class="actions"><a href="/dashboard/feedback/{id}/reply/">Reply</a> <a href="/delete/feedback/{id}/?next=admin_dashboard">Delete</a></p>
{replies}</article>"#,
            replies = replies_html(thread),
        );
        body.push_str(&feedback_card(&thread.feedback, &actions));
    }
    layout(user, flashes, "Feedback dashboard", &body)
}

pub fn edit_feedback(
    user: &CurrentUser,
    flashes: &[Flash],
    id: FeedbackId,
    input: &FeedbackInput,
    error: Option<&str>,
) -> Html<String> {
    let errors: Vec<String> = error.map(str::to_string).into_iter().collect();
    let body = format!(
        r#"{errors}
<form method="post" action="/update/feedback/{id}/">
{fields}
<button type="submit">Save changes</button>
<a href="/my/feedback/">Cancel</a>
</form>"#,
        errors = error_list(&errors),
        fields = feedback_fields(input),
    );
    layout(user, flashes, "Edit feedback", &body)
}

pub fn confirm_delete(
    user: &CurrentUser,
    flashes: &[Flash],
    feedback: &Feedback,
    next: Option<&Destination>,
    cancel: &Destination,
) -> Html<String> {
    let hidden = next.map_or_else(String::new, |dest| {
        format!(
            r#"<input type="hidden" name="next" value="{}">"#,
            attr(dest.token())
        )
    });
    let body = format!(
        r#"<p>Delete this feedback? Replies to it will be removed as well.</p>
{card}</article>
<form method="post" action="/delete/feedback/{id}/">
{hidden}
<button type="submit" class="danger">Delete</button>
<a href="{cancel}">Cancel</a>
</form>"#,
        card = feedback_card(feedback, ""),
        id = feedback.id,
        cancel = attr(cancel.path()),
    );
    layout(user, flashes, "Delete feedback", &body)
}

pub fn reply(user: &CurrentUser, flashes: &[Flash], thread: &FeedbackThread) -> Html<String> {
    let id = thread.feedback.id;
    let body = format!(
        r#"{card}{replies}</article>
<form method="post" action="/dashboard/feedback/{id}/reply/">
<label>Reply <textarea name="message" rows="5" required></textarea></label>
<button type="submit">Send reply</button>
<a href="/dashboard">Back to dashboard</a>
</form>"#,
        card = feedback_card(&thread.feedback, ""),
        replies = replies_html(thread),
    );
    layout(user, flashes, "Reply to feedback", &body)
}

pub fn not_found() -> Html<String> {
    layout(
        &CurrentUser::Anonymous,
        &[],
        "Not found",
        r#"<p>The page you requested does not exist.</p><p><a href="/">Go home</a></p>"#,
    )
}

pub fn server_error() -> Html<String> {
    layout(
        &CurrentUser::Anonymous,
        &[],
        "Something went wrong",
        "<p>The server hit an unexpected error. Please try again.</p>",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SessionUser, UserId};

    fn feedback(name: &str, message: &str) -> Feedback {
        Feedback {
            id: FeedbackId::new(7),
            author: Some(UserId::new(1)),
            name: name.to_string(),
            email: "a@example.com".to_string(),
            message: message.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn user_text_is_escaped() {
        let thread = FeedbackThread {
            feedback: feedback("<b>bob</b>", "<script>alert(1)</script>"),
            replies: vec![],
        };
        let Html(page) = my_feedback(&CurrentUser::Anonymous, &[], &[thread]);
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("&lt;b&gt;bob&lt;/b&gt;"));
    }

    #[test]
    fn confirm_delete_carries_next_token() {
        let user = CurrentUser::Authenticated(SessionUser {
            id: UserId::new(1),
            username: "alice".to_string(),
            is_staff: false,
            is_superuser: false,
        });
        let Html(page) = confirm_delete(
            &user,
            &[],
            &feedback("alice", "hi"),
            Some(&Destination::MyFeedback),
            &Destination::MyFeedback,
        );
        assert!(page.contains(r#"name="next" value="my_feedback""#));
        assert!(page.contains(r#"action="/delete/feedback/7/""#));
    }

    #[test]
    fn flashes_are_rendered() {
        let Html(page) = home(&CurrentUser::Anonymous, &[Flash::error("Message cannot be empty")]);
        assert!(page.contains("flash-error"));
        assert!(page.contains("Message cannot be empty"));
    }
}
