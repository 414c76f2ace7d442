// Colored terminal output helpers
use colored::Colorize;

pub fn print_success(msg: &str) {
    println!("{} {}", "DONE".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "FAIL".red(), msg);
}

pub fn print_project(msg: &str) {
    println!("{} {}", "[PROJECT]".cyan(), msg);
}

pub fn print_package(msg: &str) {
    println!("{} {}", "[PACKAGE]".blue(), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "⚠️ ".yellow(), msg);
}
