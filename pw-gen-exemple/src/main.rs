use std::sync::Arc;

use pw_gen_core::{GeneratorConfig, PasswordGenerator, PasswordRestrictions, SequenceModel};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Train an order-2 model from a line-delimited dataset.
    // Blank lines are skipped.
    let config = GeneratorConfig::default();
    let model = SequenceModel::train_from_file("./data/passwords.txt", config.order)?;
    println!("Training score mean: {:.4}, std dev: {:.4}", model.mean(), model.std_dev());

    // Save it next to the dataset, once as JSON and once in the binary format
    model.save("./data/model.json")?;
    model.save("./data/model.bin")?;

    // The generator shares the model read-only
    let generator = PasswordGenerator::new(config, Arc::new(model));

    // Fully random, 12 characters, at least 2 digits and 2 specials
    let random = PasswordRestrictions {
        min_length: 12,
        max_length: 12,
        min_digits: 2,
        min_special_chars: 2,
        ..Default::default()
    };

    // Sampled from the model, then repaired to fit
    let readable = PasswordRestrictions {
        user_readable: true,
        min_length: 8,
        max_length: 14,
        min_digits: 2,
        ..Default::default()
    };

    // Same, continuing a custom prefix, all uppercase
    let prefixed = PasswordRestrictions {
        prefix: Some("sun".to_owned()),
        all_upper_case: true,
        ..readable.clone()
    };

    // Impossible: more digits than characters
    let invalid = PasswordRestrictions { min_digits: 5, max_length: 4, ..Default::default() };

    for (label, restrictions) in [("random", &random), ("readable", &readable), ("prefixed", &prefixed)] {
        for i in 0..3 {
            match generator.generate(restrictions) {
                Ok(password) => println!("{label} {}: {password}", i + 1),
                Err(e) => println!("{label} {}: failed ({e})", i + 1),
            }
        }
    }

    match generator.generate(&invalid) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Rejected as expected: {e}"),
    }

    Ok(())
}
