// FICHIER : src-db/src/utils/logger.rs

use std::path::Path;
use std::sync::Once;
use tracing_appender::rolling;
use tracing_subscriber::{
    filter::filter_fn, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

// Sécurité pour éviter la double initialisation (crash fréquent en tests)
static INIT: Once = Once::new();

pub fn init_logging(data_root: &Path) {
    INIT.call_once(|| {
        let log_dir = data_root.join("_system").join("logs");
        std::fs::create_dir_all(&log_dir).ok();

        // =========================================================================
        // LAYER 1 : FICHIER (JSON structuré)
        // =========================================================================
        let file_appender = rolling::daily(&log_dir, "bibliomap.log");

        let file_layer = fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        // =========================================================================
        // LAYER 2 : CONSOLE (Pour l'Humain)
        // =========================================================================
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

        // Filtre anti-doublon : les macros user_* écrivent déjà sur la console
        let anti_double_filter =
            filter_fn(|metadata| !metadata.fields().iter().any(|f| f.name() == "event"));

        let console_layer = fmt::layer()
            .compact()
            .with_target(false)
            .with_filter(env_filter)
            .with_filter(anti_double_filter);

        // =========================================================================
        // ASSEMBLAGE ET INITIALISATION
        // =========================================================================
        let registry = tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer);

        if registry.try_init().is_err() {
            tracing::warn!("⚠️ [Logger] Ré-initialisation ignorée (subscriber global déjà actif).");
            return;
        }

        tracing::info!("🚀 Logger initialisé. Logs disponibles dans : {:?}", log_dir);
    });
}
