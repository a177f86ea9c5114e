// FICHIER : src-db/src/utils/macros.rs

/// Affiche une info à l'utilisateur et logue l'événement
#[macro_export]
macro_rules! user_info {
    ($($arg:tt)*) => {{
        let msg = format!($($arg)*);
        println!("{}", msg);
        tracing::info!(event = "user_notification", message = %msg);
    }};
}

/// Affiche un succès (vert) à l'utilisateur
#[macro_export]
macro_rules! user_success {
    ($($arg:tt)*) => {{
        let msg = format!($($arg)*);
        println!("✅ {}", msg);
        tracing::info!(event = "user_success", message = %msg);
    }};
}

/// Affiche un avertissement non bloquant
#[macro_export]
macro_rules! user_warn {
    ($($arg:tt)*) => {{
        let msg = format!($($arg)*);
        println!("⚠️ {}", msg);
        tracing::warn!(event = "user_warning", message = %msg);
    }};
}

/// Affiche une erreur à l'utilisateur ET logue la trace technique
#[macro_export]
macro_rules! user_error {
    ($($arg:tt)*) => {{
        let msg = format!($($arg)*);
        eprintln!("❌ {}", msg);
        tracing::error!(event = "user_error", message = %msg);
    }};
}
