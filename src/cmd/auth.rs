//! Account commands: `landreg login`, `register`, `logout`, `whoami`.

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, Password, Select, theme::ColorfulTheme};

use landreg::config::LandregConfig;
use landreg::controller::SubmitOutcome;
use landreg::form::validate::{StrengthLevel, password_strength};
use landreg::form::{
    AccountType, FieldStore, InputEvent, LoginForm, RegisterStep, RegisterUpdate,
    RegistrationWizard,
};
use landreg::i18n::Locale;
use landreg::ui::icons::PERSON;
use landreg::ui::{print_field_errors, spinner};

use super::{AppContext, cancel_on_ctrl_c, finish};

pub async fn cmd_login(
    config: &LandregConfig,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let ctx = AppContext::new(config)?;
    let theme = ColorfulTheme::default();

    let email = match email {
        Some(email) => email,
        None => Input::<String>::with_theme(&theme)
            .with_prompt("Email")
            .allow_empty(true)
            .interact_text()?,
    };
    let password = match password {
        Some(password) => password,
        None => Password::with_theme(&theme)
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact()?,
    };

    let mut form = FieldStore::new(LoginForm::default(), config.locale);
    form.apply_input(InputEvent::text("email", email))?;
    form.apply_input(InputEvent::text("password", password))?;

    let cancel = cancel_on_ctrl_c();
    let bar = spinner("Signing in...");
    let outcome = ctx.controller.login(&mut form, &cancel).await;
    bar.finish_and_clear();

    if outcome == SubmitOutcome::Invalid {
        print_field_errors(form.errors());
    }
    finish(outcome, "Login")
}

pub async fn cmd_register(config: &LandregConfig) -> Result<()> {
    let ctx = AppContext::new(config)?;
    let theme = ColorfulTheme::default();
    let mut wizard = RegistrationWizard::new(config.locale);
    let cancel = cancel_on_ctrl_c();

    loop {
        match wizard.step() {
            RegisterStep::Identity => {
                println!();
                println!("{}", style("Step 1/2: identity").bold());
                prompt_identity(&theme, &mut wizard)?;
                if wizard.advance() == RegisterStep::Identity {
                    print_field_errors(wizard.store().errors());
                }
            }
            RegisterStep::Credentials => {
                println!();
                println!("{}", style("Step 2/2: credentials").bold());
                prompt_credentials(&theme, &mut wizard, config.locale)?;

                let bar = spinner("Creating account...");
                let outcome = ctx.controller.register(&mut wizard, &cancel).await;
                bar.finish_and_clear();

                if outcome != SubmitOutcome::Invalid {
                    return finish(outcome, "Registration");
                }
                print_field_errors(wizard.store().errors());
                let go_back = Confirm::with_theme(&theme)
                    .with_prompt("Edit identity details first?")
                    .default(false)
                    .interact()?;
                if go_back {
                    wizard.back();
                }
            }
        }
    }
}

fn prompt_text(theme: &ColorfulTheme, prompt: &str, current: &str) -> Result<String> {
    Ok(Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?)
}

fn prompt_identity(theme: &ColorfulTheme, wizard: &mut RegistrationWizard) -> Result<()> {
    let current = wizard.store().snapshot();
    let store = wizard.store_mut();

    store.set(RegisterUpdate::FirstName(prompt_text(
        theme,
        "First name",
        &current.first_name,
    )?));
    store.set(RegisterUpdate::LastName(prompt_text(
        theme,
        "Last name",
        &current.last_name,
    )?));
    store.set(RegisterUpdate::Email(prompt_text(theme, "Email", &current.email)?));
    store.set(RegisterUpdate::PhoneNumber(prompt_text(
        theme,
        "Phone number",
        &current.phone_number,
    )?));

    let kinds = [AccountType::Individual, AccountType::Organization];
    let selected = Select::with_theme(theme)
        .with_prompt("Account type")
        .items(&["Individual", "Organization"])
        .default(kinds.iter().position(|k| *k == current.account_type).unwrap_or(0))
        .interact()?;
    let account_type = kinds[selected];
    store.set(RegisterUpdate::AccountType(account_type));

    if account_type == AccountType::Organization {
        store.set(RegisterUpdate::Organization(prompt_text(
            theme,
            "Organization",
            &current.organization,
        )?));
    } else {
        store.set(RegisterUpdate::Organization(String::new()));
    }
    Ok(())
}

fn prompt_credentials(
    theme: &ColorfulTheme,
    wizard: &mut RegistrationWizard,
    locale: Locale,
) -> Result<()> {
    let store = wizard.store_mut();

    let password = Password::with_theme(theme)
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()?;
    println!("  {}", strength_meter(&password, locale));
    store.set(RegisterUpdate::Password(password));

    let confirm = Password::with_theme(theme)
        .with_prompt("Confirm password")
        .allow_empty_password(true)
        .interact()?;
    store.set(RegisterUpdate::ConfirmPassword(confirm));

    let accepted = Confirm::with_theme(theme)
        .with_prompt("Accept the terms of use?")
        .default(false)
        .interact()?;
    store.set(RegisterUpdate::AcceptTerms(accepted));
    Ok(())
}

/// Four-segment bar plus the level label, coloured by level.
fn strength_meter(password: &str, locale: Locale) -> String {
    let score = password_strength(password);
    let level = StrengthLevel::from_score(score);
    let score = usize::from(score);
    let bar = format!("{}{}", "■".repeat(score), "□".repeat(4 - score));
    let text = format!("{} {}", bar, level.label(locale));
    match level {
        StrengthLevel::Weak => style(text).red().to_string(),
        StrengthLevel::Medium => style(text).yellow().to_string(),
        StrengthLevel::Strong => style(text).cyan().to_string(),
        StrengthLevel::VeryStrong => style(text).green().to_string(),
    }
}

pub fn cmd_logout(config: &LandregConfig) -> Result<()> {
    let ctx = AppContext::new(config)?;
    ctx.controller.logout()?;
    Ok(())
}

pub fn cmd_whoami(config: &LandregConfig) -> Result<()> {
    let ctx = AppContext::new(config)?;
    let session = ctx.controller.store().read(|s| s.session().cloned());

    match session {
        Some(session) => {
            let user = &session.user_info;
            println!("{}{}", PERSON, style(user.full_name()).bold());
            println!("  email: {}", user.email);
            if let Some(role) = &user.role {
                println!("  role:  {}", role);
            }
            println!("  session: {}", ctx.storage.path().display());
        }
        None => {
            println!("Not signed in.");
            println!("Run 'landreg login' to sign in.");
        }
    }
    Ok(())
}
