use eframe::egui::{Button, CentralPanel, Context, Frame, Key, Margin, TextEdit};

use crate::ui::app_state::AuthMode;
use crate::ui::config::UI_TEXT;
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::colored_heading;

use super::app::TradexApp;

impl TradexApp {
    /// Login / register card shown while there is no session.
    pub(super) fn render_auth(&mut self, ctx: &Context) {
        let mut submit = false;

        CentralPanel::default().show(ctx, |ui| {
            ui.add_space(ui.available_height() * 0.2);
            ui.vertical_centered(|ui| {
                ui.heading(colored_heading(UI_TEXT.app_title));
                ui.add_space(12.0);

                Frame::group(ui.style())
                    .inner_margin(Margin::same(16))
                    .show(ui, |ui| {
                        ui.set_width(280.0);
                        let form = &mut self.auth_form;
                        let heading = match form.mode {
                            AuthMode::Login => UI_TEXT.auth_login_heading,
                            AuthMode::Register => UI_TEXT.auth_register_heading,
                        };
                        ui.label_subheader(heading);
                        ui.add_space(8.0);

                        ui.add(
                            TextEdit::singleline(&mut form.username)
                                .hint_text(UI_TEXT.auth_username),
                        );
                        let password = ui.add(
                            TextEdit::singleline(&mut form.password)
                                .hint_text(UI_TEXT.auth_password)
                                .password(true),
                        );
                        if password.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                            submit = true;
                        }

                        ui.add_space(8.0);
                        let label = match form.mode {
                            AuthMode::Login => UI_TEXT.auth_login_button,
                            AuthMode::Register => UI_TEXT.auth_register_button,
                        };
                        if ui.add_enabled(!form.busy, Button::new(label)).clicked() {
                            submit = true;
                        }
                        if form.busy {
                            ui.spinner();
                        }
                        if let Some(err) = &form.error {
                            ui.label_error(err);
                        }

                        ui.add_space(8.0);
                        let (switch_label, next) = match form.mode {
                            AuthMode::Login => (UI_TEXT.auth_switch_to_register, AuthMode::Register),
                            AuthMode::Register => (UI_TEXT.auth_switch_to_login, AuthMode::Login),
                        };
                        if ui.link(switch_label).clicked() {
                            form.mode = next;
                            form.error = None;
                        }
                    });
            });
        });

        if submit && !self.auth_form.busy {
            self.submit_auth();
        }
    }
}
