// ABOUTME: Command-line tool that submits one message through the same encoder and SMPP session
// ABOUTME: as the gateway, bypassing HTTP, authentication and the cache

use anyhow::{Context, Result};
use argh::FromArgs;
use smsgate::client::{
    BindCredentials, CarrierSession, KeepAliveConfig, SessionOptions, SmppSession, SmsMessage,
};
use smsgate::gateway::TextEncoding;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Send a single SMS over SMPP
#[derive(FromArgs)]
struct CliArgs {
    /// log every PDU exchange
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// the system id
    #[argh(option)]
    system_id: Option<String>,

    /// the password
    #[argh(option)]
    password: Option<String>,

    /// the hostname or IP address of the SMSC (default: localhost)
    #[argh(option)]
    host: Option<String>,

    /// the port to use when connecting to the SMSC (default: 2775)
    #[argh(option, short = 'p')]
    port: Option<u16>,

    /// the message to send
    #[argh(option, short = 'm')]
    message: String,

    /// the recipient telephone number
    #[argh(option, short = 't')]
    to: String,

    /// the telephone number or sender id the message will be from
    #[argh(option, short = 'f')]
    from: String,

    /// text encoding: GSM7, GSM7Packed, ISO88595, Latin1, UCS2 (default: raw UTF-8)
    #[argh(option, short = 'e')]
    encoding: Option<String>,

    /// correlation id sent as receipted_message_id
    #[argh(option)]
    id: Option<String>,

    /// seconds to wait for each SMSC response (default: 10)
    #[argh(option)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: CliArgs = argh::from_env();

    let level = if args.debugging { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let host = args.host.unwrap_or_else(|| "localhost".to_owned());
    let port = args.port.unwrap_or(2775);
    let credentials = BindCredentials::transmitter(
        args.system_id.unwrap_or_default(),
        args.password.unwrap_or_default(),
    );
    let options = SessionOptions {
        response_timeout: Duration::from_secs(args.timeout.unwrap_or(10)),
        keep_alive: KeepAliveConfig::disabled(),
    };

    let session = SmppSession::establish(format!("{host}:{port}"), &credentials, options)
        .await
        .with_context(|| format!("connect/bind to {host}:{port} failed"))?;

    let encoding = TextEncoding::from_label(args.encoding.as_deref().unwrap_or(""));
    let encoded = encoding.encode(&args.message);
    let mut sms = SmsMessage::new(args.to, args.from, encoded.bytes)
        .with_data_coding(encoded.data_coding);
    if let Some(id) = args.id {
        sms = sms.with_correlation_id(id);
    }

    let result = session.submit(&sms).await;
    session.shutdown().await;

    let receipt = result.context("submit_sm failed")?;
    println!("Message accepted with ID: {}", receipt.message_id);
    Ok(())
}
