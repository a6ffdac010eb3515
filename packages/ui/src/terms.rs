use dioxus::prelude::*;

const CONTACT_EMAIL: &str = "contact@vsagrawal.in";

/// Static terms and conditions.
#[component]
pub fn Terms() -> Element {
    rsx! {
        div {
            class: "terms",
            h2 { "Terms and Conditions:" }

            h3 { "1. Acceptance of Terms" }
            p {
                "By signing in you also create an account with us, if an account doesn't already exist. "
                "You also opt to receive emails on registered Email address, and messages on WhatsApp "
                "if a valid Indian mobile number is provided."
            }

            h3 { "2. User Registration" }
            p {
                "By registering, users consent to receive One-Time Passwords (OTPs) for login "
                "verification and onboarding messages via WhatsApp and Email."
            }
            p { "Only valid Indian mobile numbers should be used to register for using our services." }

            h3 { "3. WhatsApp Messaging" }
            p { "Users will receive OTPs on WhatsApp to facilitate secure login to their accounts." }
            p { "After logging in, users will receive onboarding messages and reminders for meetings they set." }
            p {
                "All messages sent will comply with WhatsApp's Business Messaging Policy, including the "
                "use of approved Message Templates for any communication outside the 24-hour customer "
                "service window."
            }

            h4 { "3a. Opt-In and Opt-Out" }
            p {
                "Users opt-in to receive WhatsApp messages at the time of account creation where they "
                "have to provide their WhatsApp registered mobile number."
            }
            p { "Users can opt-out of receiving WhatsApp messages by:" }
            ul {
                li { "Deactivating their account through the user details page." }
                li {
                    "Sending an email to "
                    a { href: "mailto:{CONTACT_EMAIL}", "{CONTACT_EMAIL}" }
                    "."
                }
            }

            h3 { "4. Data Protection and Privacy" }
            p {
                "We are committed to protecting your personal information. We will only use your data "
                "as necessary to provide our services and in compliance with applicable laws."
            }

            h3 { "5. Prohibited Activities" }
            p { "Users are prohibited from:" }
            ul {
                li { "Using the service for any unlawful or unauthorized purposes." }
                li { "Storing sensitive personal information (such as financial details) on the platform." }
                li { "Engaging in activities that violate WhatsApp's policies or guidelines." }
            }

            h3 { "6. Limitation of Liability" }
            p {
                "We will not be liable for any indirect, incidental, or consequential damages arising "
                "from your use of our services or inability to access them."
            }

            h3 { "7. Changes to Terms" }
            p {
                "We reserve the right to modify these Terms and Conditions at any time. Users will be "
                "notified of significant changes via email or through our platform."
            }

            h3 { "8. Governing Law" }
            p { "These Terms and Conditions shall be governed by the laws applicable in India." }
        }
    }
}
