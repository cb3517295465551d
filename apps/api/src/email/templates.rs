use super::OutgoingEmail;

const APP_NAME: &str = "Anonymous Feedback";

pub fn verification_email(to: &str, username: &str, code: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: format!("{APP_NAME} - Verification Code"),
        html: code_email_html(
            username,
            "Thank you for registering. Please use the following code to verify your account:",
            code,
        ),
    }
}

pub fn password_reset_email(to: &str, username: &str, code: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: format!("{APP_NAME} - Password Reset Code"),
        html: code_email_html(
            username,
            "We received a request to reset your password. Use the following code to choose a new one:",
            code,
        ),
    }
}

fn code_email_html(username: &str, intro: &str, code: &str) -> String {
    format!(
        "<!DOCTYPE html>\
         <html lang=\"en\"><head><meta charset=\"utf-8\"><title>{APP_NAME}</title></head>\
         <body style=\"font-family: Roboto, Verdana, sans-serif;\">\
         <h2>Hello {username},</h2>\
         <p>{intro}</p>\
         <p style=\"font-size: 24px; font-weight: bold; letter-spacing: 4px;\">{code}</p>\
         <p>This code expires in one hour. If you did not request it, please ignore this email.</p>\
         </body></html>",
        username = escape_html(username),
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
