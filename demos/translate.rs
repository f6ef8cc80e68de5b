//! Live API walkthrough: translation, detection, sentence breaking

use dotenvy::dotenv;
use ms_translator::{TranslateRequest, Translator, TranslatorConfig};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let key = match std::env::var("MS_TRANSLATOR_SUBSCRIPTION_KEY") {
        Ok(key) => key,
        Err(_) => {
            println!("MS_TRANSLATOR_SUBSCRIPTION_KEY is not set");
            return;
        }
    };

    let translator = match Translator::new(TranslatorConfig::new(key)) {
        Ok(t) => t,
        Err(e) => {
            println!("Failed to create translator: {}", e);
            return;
        }
    };

    println!("--- translate ---");
    let request = TranslateRequest::to("es").with_from("en");
    match translator.translate("Hello, world!", &request).await {
        Ok(text) => println!("Hello, world! -> {}", text),
        Err(e) => println!("translate failed: {}", e),
    }

    println!("\n--- translate_batch ---");
    match translator
        .translate_batch(&["hello", "world"], &TranslateRequest::to("es"))
        .await
    {
        Ok(items) => {
            for item in items {
                println!("-> {}", item.translations[0].text);
            }
        }
        Err(e) => println!("translate_batch failed: {}", e),
    }

    println!("\n--- detect_languages ---");
    match translator.detect_languages(&["Hello", "Привет"]).await {
        Ok(langs) => println!("detected: {:?}", langs),
        Err(e) => println!("detect_languages failed: {}", e),
    }

    println!("\n--- break_sentences ---");
    match translator
        .break_sentences("Hello. How are you?", "en")
        .await
    {
        Ok(sentences) => println!("sentences: {:?}", sentences),
        Err(e) => println!("break_sentences failed: {}", e),
    }

    println!("\n--- language_display_names ---");
    match translator.language_display_names(&["ru", "en"], "en").await {
        Ok(names) => println!("names: {:?}", names),
        Err(e) => println!("language_display_names failed: {}", e),
    }
}
