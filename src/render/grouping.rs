//! Vista agrupada de la malla curricular
//!
//! Agrupa los pares contenido-PDA por asignatura conservando el orden de
//! primera aparición y el orden interno de cada grupo. Es una vista
//! derivada: se recalcula en cada exportación y nunca se muta aparte del
//! documento fuente.

use crate::models::plan::ContentPdaPair;

/// Grupo de vínculos curriculares de una misma asignatura
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectGroup<'a> {
    pub asignatura: String,
    pub entries: Vec<&'a ContentPdaPair>,
}

/// Agrupa los vínculos por asignatura
///
/// Función pura. Las entradas sin etiqueta de asignatura caen en el grupo
/// de reserva "Campo Formativo".
pub fn group_by_subject(links: &[ContentPdaPair]) -> Vec<SubjectGroup<'_>> {
    let mut groups: Vec<SubjectGroup<'_>> = Vec::new();
    for link in links {
        let key = if link.asignatura.trim().is_empty() {
            "Campo Formativo"
        } else {
            link.asignatura.as_str()
        };
        match groups.iter_mut().find(|g| g.asignatura == key) {
            Some(group) => group.entries.push(link),
            None => groups.push(SubjectGroup {
                asignatura: key.to_string(),
                entries: vec![link],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(asignatura: &str, contenido: &str) -> ContentPdaPair {
        ContentPdaPair {
            asignatura: asignatura.to_string(),
            contenido: contenido.to_string(),
            pda_vinculados: Vec::new(),
        }
    }

    #[test]
    fn test_orden_de_primera_aparicion() {
        let links = vec![
            link("Lenguajes", "C1"),
            link("Saberes", "C2"),
            link("Lenguajes", "C3"),
            link("Ética", "C4"),
        ];
        let groups = group_by_subject(&links);
        let keys: Vec<&str> = groups.iter().map(|g| g.asignatura.as_str()).collect();
        assert_eq!(keys, vec!["Lenguajes", "Saberes", "Ética"]);
        assert_eq!(groups[0].entries.len(), 2);
        assert_eq!(groups[0].entries[1].contenido, "C3");
    }

    #[test]
    fn test_los_grupos_reparten_todas_las_entradas() {
        let links = vec![
            link("A", "1"),
            link("B", "2"),
            link("A", "3"),
            link("C", "4"),
            link("B", "5"),
            link("A", "6"),
        ];
        let groups = group_by_subject(&links);
        let total: usize = groups.iter().map(|g| g.entries.len()).sum();
        assert_eq!(total, links.len());

        // Concatenar los grupos reproduce una permutación del original
        // con cada grupo en su orden interno
        let contenidos: Vec<&str> = groups
            .iter()
            .flat_map(|g| g.entries.iter().map(|e| e.contenido.as_str()))
            .collect();
        assert_eq!(contenidos, vec!["1", "3", "6", "2", "5", "4"]);
    }

    #[test]
    fn test_sin_asignatura_cae_en_grupo_de_reserva() {
        let links = vec![link("", "C1"), link("  ", "C2"), link("Lenguajes", "C3")];
        let groups = group_by_subject(&links);
        assert_eq!(groups[0].asignatura, "Campo Formativo");
        assert_eq!(groups[0].entries.len(), 2);
    }

    #[test]
    fn test_vacio() {
        assert!(group_by_subject(&[]).is_empty());
    }
}
