use super::missions::Mission;

/// Bullet list of missions for the message body.
pub fn format_missions(missions: &[Mission]) -> String {
    if missions.is_empty() {
        return "Aucune mission assignée pour le moment.".to_string();
    }
    missions
        .iter()
        .map(|m| format!("• {} : {}", m.role, m.hour))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assignment message sent once the planning is final.
pub fn assignment_body(name: &str, missions: &[Mission], sheet_link: &str) -> String {
    format!(
        "Bonjour {name},

Un immense merci d'avoir répondu à notre appel ! Grâce à vous, ça va être une chouette fête.

Le planning a été difficile à boucler : si vous avez répondu \"pas de limite\", il est possible que vous ayez quelques heures de plus que prévu.
De nouveaux bénévoles peuvent encore s'inscrire, pensez à relire vos mails la veille.

---

Voici tes missions pour le jour J :

{missions}

---

Le tableau pour échanger un créneau avec quelqu'un si besoin :
{sheet_link}

---

Encore mille mercis, et à très vite !

La team bénévole
",
        missions = format_missions(missions),
    )
}

/// Thank-you message sent after the event.
pub fn thanks_body(name: &str, questionnaire_link: &str) -> String {
    format!(
        "Chèr·e {name},

Une myriade de merci ! Ton aide a été précieuse tout au long de la journée, et c'est grâce à des personnes comme toi que la fête a eu lieu dans la joie et la bonne humeur.

Voici un petit questionnaire de retour, qui te permet aussi de t'inscrire à notre liste pour qu'on te recontacte l'année prochaine :
{questionnaire_link}

Passe une très belle semaine,
L'équipe d'organisation
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missions_render_as_bullets() {
        let missions = vec![
            Mission { role: "Service au bar".into(), hour: "14h-15h".into() },
            Mission { role: "Vaisselle".into(), hour: "15h-16h".into() },
        ];
        assert_eq!(
            format_missions(&missions),
            "• Service au bar : 14h-15h\n• Vaisselle : 15h-16h"
        );
        assert_eq!(format_missions(&[]), "Aucune mission assignée pour le moment.");
    }

    #[test]
    fn bodies_carry_name_missions_and_links() {
        let missions = vec![Mission { role: "Toilettes".into(), hour: "18h-19h".into() }];
        let body = assignment_body("Léa Dupont", &missions, "https://example.org/sheet");
        assert!(body.starts_with("Bonjour Léa Dupont,"));
        assert!(body.contains("• Toilettes : 18h-19h"));
        assert!(body.contains("https://example.org/sheet"));

        let thanks = thanks_body("Léa Dupont", "https://example.org/form");
        assert!(thanks.contains("Chèr·e Léa Dupont,"));
        assert!(thanks.contains("https://example.org/form"));
    }
}
