use anyhow::{bail, Context};
use clap::{Arg, ArgMatches, Command};
use log::LevelFilter;
use std::process;
use syncflow_core::config::{Config, DEFAULT_CONFIG_PATH};
use syncflow_core::mms::{
    self, compress_image_to_fit, encode_send_request, parse_send_request, Attachment,
    MmsSendRequest,
};
use syncflow_core::spam::{SpamQuery, SpamScorer};

/// Room left in the carrier budget for headers, SMIL and text when sizing the image.
const PDU_OVERHEAD_BYTES: usize = 2048;

fn main() {
    let matches = Command::new("syncflow")
        .version(env!("CARGO_PKG_VERSION"))
        .about("SMS spam scoring and MMS send-request encoding")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value(DEFAULT_CONFIG_PATH),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Test configuration validity")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check-message")
                .long("check-message")
                .value_name("BODY")
                .help("Score a message body and print the result as JSON")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("sender")
                .long("sender")
                .value_name("SENDER")
                .help("Sender address or id for --check-message")
                .default_value(""),
        )
        .arg(
            Arg::new("contact")
                .long("contact")
                .help("Treat the sender as a saved contact")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("unread")
                .long("unread")
                .help("Treat the message as unread")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("age-hours")
                .long("age-hours")
                .value_name("HOURS")
                .help("Hours since the message arrived")
                .value_parser(clap::value_parser!(u64))
                .default_value("0"),
        )
        .arg(
            Arg::new("threshold")
                .long("threshold")
                .value_name("T")
                .help("Override the configured spam threshold")
                .value_parser(clap::value_parser!(f32)),
        )
        .arg(
            Arg::new("encode-mms")
                .long("encode-mms")
                .help("Encode an m-send-req PDU")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .value_name("NUMBER")
                .help("Recipient phone number for --encode-mms"),
        )
        .arg(
            Arg::new("text")
                .long("text")
                .value_name("TEXT")
                .help("Message text for --encode-mms"),
        )
        .arg(
            Arg::new("image")
                .long("image")
                .value_name("FILE")
                .help("Image to attach for --encode-mms"),
        )
        .arg(
            Arg::new("subject")
                .long("subject")
                .value_name("SUBJECT")
                .help("Subject for --encode-mms"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Where --encode-mms writes the PDU"),
        )
        .arg(
            Arg::new("inspect-pdu")
                .long("inspect-pdu")
                .value_name("FILE")
                .help("Decode an m-send-req PDU and print a summary")
                .action(clap::ArgAction::Set),
        )
        .get_matches();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG_PATH);

    let loaded = match load_config(config_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            process::exit(1);
        }
    };

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        loaded
            .as_ref()
            .and_then(|c| c.logging.level.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info)
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let config = loaded.unwrap_or_else(|| {
        log::warn!("Configuration file '{config_path}' not found, using default configuration");
        Config::default()
    });

    let outcome = if matches.get_flag("test-config") {
        test_config(&config, config_path);
        Ok(())
    } else if let Some(body) = matches.get_one::<String>("check-message") {
        check_message(&config, body, &matches)
    } else if matches.get_flag("encode-mms") {
        encode_mms(&config, &matches)
    } else if let Some(path) = matches.get_one::<String>("inspect-pdu") {
        inspect_pdu(path)
    } else {
        eprintln!("Nothing to do; see --help");
        process::exit(2);
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// `None` when the file does not exist; the caller falls back to defaults.
fn load_config(path: &str) -> anyhow::Result<Option<Config>> {
    if std::path::Path::new(path).exists() {
        Config::from_file(path)
            .map(Some)
            .with_context(|| format!("reading {path}"))
    } else {
        Ok(None)
    }
}

fn generate_default_config(path: &str) {
    let config = Config::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Please edit the configuration file to suit your needs.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e}");
            process::exit(1);
        }
    }
}

fn test_config(config: &Config, path: &str) {
    println!("Configuration: {path}");
    println!("  spam threshold:        {:.2}", config.spam.threshold);
    println!("  extra trusted senders: {}", config.spam.trusted_senders.len());
    println!("  blocked senders:       {}", config.spam.blocked_senders.len());
    println!("  extra keywords:        {}", config.spam.extra_keywords.len());
    println!("  MMS budget:            {} bytes", config.mms.max_message_bytes);
    println!(
        "  image bounds:          {}x{}",
        bound_label(config.mms.max_image_width),
        bound_label(config.mms.max_image_height)
    );
    println!("Configuration is valid");
}

fn bound_label(bound: Option<u32>) -> String {
    bound.map_or_else(|| "any".to_string(), |b| b.to_string())
}

fn check_message(config: &Config, body: &str, matches: &ArgMatches) -> anyhow::Result<()> {
    let sender = matches
        .get_one::<String>("sender")
        .map(String::as_str)
        .unwrap_or("");
    let threshold = matches
        .get_one::<f32>("threshold")
        .copied()
        .unwrap_or(config.spam.threshold);
    let age_hours = matches.get_one::<u64>("age-hours").copied().unwrap_or(0);

    let scorer = SpamScorer::from_config(&config.spam);
    let query = SpamQuery::new(body, sender)
        .from_contact(matches.get_flag("contact"))
        .read(!matches.get_flag("unread"))
        .age_hours(age_hours)
        .threshold(threshold);

    let result = scorer.check(&query);
    log::info!(
        "Checked message from '{}': spam={} confidence={:.2}",
        sender,
        result.is_spam,
        result.confidence
    );

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn encode_mms(config: &Config, matches: &ArgMatches) -> anyhow::Result<()> {
    let Some(to) = matches.get_one::<String>("to") else {
        bail!("--encode-mms requires --to");
    };
    let Some(output) = matches.get_one::<String>("output") else {
        bail!("--encode-mms requires --output");
    };

    let recipient = mms::normalize_recipient(to);
    if recipient.trim_start_matches('+').is_empty() {
        bail!("recipient '{to}' contains no digits");
    }

    let mut request = MmsSendRequest::new(&recipient);
    if let Some(text) = matches.get_one::<String>("text") {
        request = request.with_text(text);
    }
    if let Some(subject) = matches.get_one::<String>("subject") {
        request = request.with_subject(subject);
    }

    if let Some(image_path) = matches.get_one::<String>("image") {
        let source =
            std::fs::read(image_path).with_context(|| format!("reading image {image_path}"))?;
        let text_len = request.text.as_ref().map_or(0, String::len);
        let budget = config
            .mms
            .max_message_bytes
            .saturating_sub(PDU_OVERHEAD_BYTES + text_len)
            .max(1);

        let compressed = compress_image_to_fit(
            &source,
            budget,
            config.mms.max_image_width,
            config.mms.max_image_height,
        )
        .with_context(|| format!("preparing image {image_path}"))?;

        if !compressed.within_budget {
            log::warn!(
                "Image is still {} bytes, over the {} byte budget",
                compressed.data.len(),
                budget
            );
        }
        log::info!(
            "Image {} -> {}x{} JPEG, {} bytes",
            image_path,
            compressed.width,
            compressed.height,
            compressed.data.len()
        );

        let mime_type = compressed.mime_type();
        request = request.with_attachment(Attachment::new(compressed.data, mime_type));
    }

    let pdu = encode_send_request(&request);
    std::fs::write(output, &pdu).with_context(|| format!("writing {output}"))?;
    log::info!("Wrote {} byte PDU for {} to {}", pdu.len(), recipient, output);
    println!("{output}: {} bytes", pdu.len());
    Ok(())
}

fn inspect_pdu(path: &str) -> anyhow::Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {path}"))?;
    let pdu = parse_send_request(&bytes).with_context(|| format!("decoding {path}"))?;

    println!("Transaction: {}", pdu.transaction_id.as_deref().unwrap_or("-"));
    if let Some((major, minor)) = pdu.mms_version {
        println!("MMS version: {major}.{minor}");
    }
    println!("To:          {}", pdu.to.join(", "));
    if let Some(subject) = &pdu.subject {
        println!("Subject:     {subject}");
    }
    println!("Content:     {}", pdu.content_type.media_type);
    println!("Parts:       {}", pdu.parts.len());
    for (index, part) in pdu.parts.iter().enumerate() {
        println!(
            "  [{index}] {:<20} {:>8} bytes  {}",
            part.content_type.media_type,
            part.size,
            part.content_location.as_deref().unwrap_or("-")
        );
    }

    log::debug!("{}", serde_json::to_string_pretty(&pdu)?);
    Ok(())
}
