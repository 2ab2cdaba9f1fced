//! Operator-facing text, one table per language.

use crate::types::Language;

#[derive(Debug)]
pub struct Messages {
    pub log_file_name: &'static str,
    pub banner: &'static str,
    pub pause_hint: &'static str,
    pub prompt_identity: &'static str,
    pub prompt_secret: &'static str,
    pub prompt_directory: &'static str,
    pub prompt_media: &'static str,
    pub invalid_media: &'static str,
    pub second_factor_required: &'static str,
    pub prompt_second_factor: &'static str,
    pub second_factor_invalid: &'static str,
    pub login_failed: &'static str,
    pub auth_problem: &'static str,
    pub unexpected_error: &'static str,
    pub progress_label: &'static str,
    pub paused: &'static str,
    pub resumed: &'static str,
    pub finished: &'static str,
}

pub static GERMAN: Messages = Messages {
    log_file_name: "ICloudDownloadService.log",
    banner: "ICloud-Backup-Service",
    pause_hint: "Drücke \"P\" um die Anwendung zu pausieren.",
    prompt_identity: "Bitte gib die iCloud E-Mail-Adresse ein: ",
    prompt_secret: "Bitte gib das iCloud Passwort ein: ",
    prompt_directory: "Bitte gib den Verzeichnispfad ein, an dem die Dateien gespeichert werden sollen: ",
    prompt_media: "Sollen Fotos oder Videos herunterladen werden? (f/v/beide): ",
    invalid_media: "Ungültige Auswahl - bitte f, v oder beide eingeben.",
    second_factor_required: "Zweifaktor-Authentifizierung erforderlich - Ein Code wurde an Ihr Geräte gesendet.",
    prompt_second_factor: "Bitte gib den Verifizierungscode ein: ",
    second_factor_invalid: "Der eingegebene Verifizierungscode ist ungültig.",
    login_failed: "Fehler bei der Anmeldung - Bitte Benutzernamen und Passwort überprüfen.",
    auth_problem: "Ein Problem mit der iCloud-Authentifizierung ist aufgetreten.",
    unexpected_error: "Ein unerwarteter Fehler ist aufgetreten - die Anwendung wird beendet...",
    progress_label: "Dateien werden heruntergeladen...",
    paused: "Download wurde pausiert.",
    resumed: "Download wird fortgesetzt.",
    finished: "Download abgeschlossen.",
};

pub static ENGLISH: Messages = Messages {
    log_file_name: "icloud_download_service.log",
    banner: "iCloud Backup Service",
    pause_hint: "Press \"P\" to pause the download.",
    prompt_identity: "Please enter your iCloud email address: ",
    prompt_secret: "Please enter your iCloud password: ",
    prompt_directory: "Please enter the directory path where files should be saved: ",
    prompt_media: "Download photos, videos, or both? (p/v/both): ",
    invalid_media: "Invalid choice - please enter p, v or both.",
    second_factor_required: "Two-factor authentication required - a code was sent to your devices.",
    prompt_second_factor: "Please enter the verification code: ",
    second_factor_invalid: "The verification code you entered is invalid.",
    login_failed: "Login failed - please check your username and password.",
    auth_problem: "A problem occurred with iCloud authentication.",
    unexpected_error: "An unexpected error occurred - the application will exit...",
    progress_label: "Downloading files...",
    paused: "Download paused.",
    resumed: "Download resumed.",
    finished: "Download finished.",
};

pub fn for_language(language: Language) -> &'static Messages {
    match language {
        Language::De => &GERMAN,
        Language::En => &ENGLISH,
    }
}
