


use lettre::{
    message::{header::ContentType as LettreContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message as LettreMessage,
    Tokio1Executor,
};
use log::info;


#[derive(Debug, thiserror::Error)]
pub enum MailError{
    #[error("Invalid Sender Or Receiver Mail Address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Can't Build The Mail: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("Smtp Relay Error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/* smtp relay info, the relay is reached over STARTTLS */
#[derive(Clone, Debug)]
pub struct SmtpInfo{
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug)]
pub struct OutgoingMail<'m>{
    pub app_name: &'m str,
    pub to: &'m str,
    pub subject: &'m str,
    pub body: String,
}

pub fn verification_body(app_name: &str, link: &str) -> String{
    format!(
        "Welcome to {}!\n\nClick to verify your account: {}\n\nIf you didn't sign up you can ignore this mail.\n",
        app_name, link
    )
}

pub async fn send_mail(smtp: &SmtpInfo, mail: OutgoingMail<'_>) -> Result<(), MailError>{

    /* both addresses are parsed before the relay is touched */
    let from = format!("{} <{}>", mail.app_name, smtp.username).parse::<Mailbox>()?;
    let to = mail.to.parse::<Mailbox>()?;

    let smtp_creds = Credentials::new(smtp.username.clone(), smtp.password.clone());

    let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(smtp.server.as_str())?
        .port(smtp.port)
        .credentials(smtp_creds)
        .build();

    let email = LettreMessage::builder()
        .from(from)
        .to(to)
        .subject(mail.subject)
        .header(LettreContentType::TEXT_PLAIN)
        .body(mail.body)?;

    mailer.send(email).await?;
    info!("📧 mail with subject [{}] sent to [{}]", mail.subject, mail.to);

    Ok(())

}


#[cfg(test)]
mod tests{

    use super::*;

    #[test]
    fn body_carries_the_link(){
        let body = verification_body("Profit Bliss", "http://127.0.0.1:7442/verify/abc");
        assert!(body.contains("http://127.0.0.1:7442/verify/abc"));
        assert!(body.starts_with("Welcome to Profit Bliss!"));
    }

    #[tokio::test]
    async fn bad_recipient_is_rejected_before_sending(){
        let smtp = SmtpInfo{
            server: "localhost".to_string(),
            port: 2525,
            username: "panel@profitbliss.com".to_string(),
            password: "secret".to_string(),
        };
        let mail = OutgoingMail{
            app_name: "Profit Bliss",
            to: "not a mailbox",
            subject: "Verify",
            body: String::from("hi"),
        };
        let res = send_mail(&smtp, mail).await;
        assert!(matches!(res, Err(MailError::Address(_))));
    }

}
