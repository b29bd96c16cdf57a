


use async_trait::async_trait;
use log::{debug, info};
use mailreq::{OutgoingMail, SmtpInfo};
use crate::constants::APP_NAME;
use crate::error::PanelError;


/*
    outbound mail seam of the panel, the smtp relay is the real one
    and the log mailer is used when no relay is configured
*/
#[async_trait]
pub trait Mailer: Send + Sync{
    async fn send_verification(&self, to: &str, link: &str) -> Result<(), PanelError>;
}

pub struct SmtpMailer{
    smtp: SmtpInfo,
}

impl SmtpMailer{
    pub fn new(smtp: SmtpInfo) -> Self{
        Self{ smtp }
    }
}

#[async_trait]
impl Mailer for SmtpMailer{

    async fn send_verification(&self, to: &str, link: &str) -> Result<(), PanelError>{

        let subject = format!("Verify your {} account", APP_NAME);
        let mail = OutgoingMail{
            app_name: APP_NAME,
            to,
            subject: &subject,
            body: mailreq::verification_body(APP_NAME, link),
        };

        mailreq::send_mail(&self.smtp, mail).await?;
        Ok(())
    }

}

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer{

    async fn send_verification(&self, to: &str, link: &str) -> Result<(), PanelError>{
        info!("📧 no smtp relay is set, verification mail for [{}] is not sent", to);
        debug!("📧 verification link for [{}] is {}", to, link);
        Ok(())
    }

}


#[cfg(test)]
mod tests{

    use super::*;

    #[actix_web::test]
    async fn log_mailer_never_fails(){
        LogMailer.send_verification("jane@profitbliss.com", "http://127.0.0.1:7442/verify/abc").await.unwrap();
    }

}
