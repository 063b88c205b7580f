#![allow(clippy::uninlined_format_args)]

use syncflow_core::spam::{SpamQuery, SpamScorer};

struct Sample {
    label: &'static str,
    body: &'static str,
    sender: &'static str,
    from_contact: bool,
    expect_spam: bool,
}

const SAMPLES: &[Sample] = &[
    Sample {
        label: "bank credit alert",
        body: "Your account is credited INR 500",
        sender: "HDFCBANK",
        from_contact: false,
        expect_spam: false,
    },
    Sample {
        label: "prize with shortener",
        body: "Congratulations you have won a cash prize! Claim now bit.ly/abc123",
        sender: "AD-PROMO",
        from_contact: false,
        expect_spam: true,
    },
    Sample {
        label: "dating lure",
        body: "hey babe check my profile pic, meet-now.xyz",
        sender: "5551234567",
        from_contact: false,
        expect_spam: true,
    },
    Sample {
        label: "toll scam",
        body: "Unpaid toll balance of $4.15. Pay now at ezpass-billing.com to avoid a late fee",
        sender: "+447911123456",
        from_contact: false,
        expect_spam: true,
    },
    Sample {
        label: "brand lookalike",
        body: "PayPal: your account is limited, confirm at paypal-account-check.xyz",
        sender: "+15559870000",
        from_contact: false,
        expect_spam: true,
    },
    Sample {
        label: "friend with link",
        body: "Photos from Saturday are up, have a look when you get a chance https://photos.example.com/album",
        sender: "+15551112222",
        from_contact: true,
        expect_spam: false,
    },
    Sample {
        label: "plain chat",
        body: "Running 10 minutes late, order me a coffee?",
        sender: "+15553334444",
        from_contact: false,
        expect_spam: false,
    },
];

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Running {} sample messages through the spam scorer", SAMPLES.len());
    println!();

    let scorer = SpamScorer::new();
    let mut mismatches = 0;

    for sample in SAMPLES {
        let query = SpamQuery::new(sample.body, sample.sender).from_contact(sample.from_contact);
        let result = scorer.check(&query);
        let ok = result.is_spam == sample.expect_spam;
        if !ok {
            mismatches += 1;
        }

        println!(
            "{} {:<22} spam={:<5} confidence={:.2}",
            if ok { "✅" } else { "❌" },
            sample.label,
            result.is_spam,
            result.confidence
        );
        for reason in &result.reasons {
            println!("     - {}", reason);
        }
    }

    println!();
    if mismatches == 0 {
        println!("All samples classified as expected");
    } else {
        println!("{} sample(s) classified differently than expected", mismatches);
    }

    Ok(())
}
