//! Renderizadores de sección
//!
//! Una función pura por sección lógica del documento. Cada una recorre su
//! subárbol del plan normalizado y emite primitivos; aquí no hay páginas,
//! ni cursores, ni bytes. Toda la opcionalidad quedó resuelta en la
//! normalización: estas funciones no comprueban `null` ni tipos.
//!
//! Orden fijo del documento:
//! 1. Cabecera de identidad
//! 2. Fundamentación y contexto
//! 3. Malla curricular vinculada
//! 4. Secuencia didáctica (siempre abre en página nueva)
//! 5. Evaluación formativa
//! 6. Bibliografía (solo si hay entradas)

use crate::models::plan::{LessonPlan, Phase, Session};
use crate::render::grouping::group_by_subject;
use crate::render::{Band, Cell, Primitive, Row, Table, TextBlock, Theme, WHITE};

/// Construye la secuencia completa de primitivos del documento
pub fn build_sections(plan: &LessonPlan, theme: &Theme) -> Vec<Primitive> {
    let mut out = Vec::new();
    out.extend(header_section(plan, theme));
    out.extend(foundation_section(plan, theme));
    out.extend(curriculum_section(plan, theme));
    out.extend(sequence_section(plan, theme));
    out.extend(evaluation_section(plan, theme));
    out.extend(bibliography_section(plan, theme));
    out
}

/// Cabecera de identidad en banda de color
///
/// El título del proyecto puede ser largo; se deja que el maquetado lo
/// envuelva en varias líneas, nunca se trunca.
fn header_section(plan: &LessonPlan, theme: &Theme) -> Vec<Primitive> {
    let gray = crate::render::Color::new(200, 200, 200);
    vec![
        Primitive::Text(
            TextBlock::new(plan.nombre_escuela.to_uppercase(), 14.0, WHITE)
                .bold()
                .on_band(theme.color_primario)
                .space_after(3.0),
        ),
        Primitive::Text(
            TextBlock::new(
                format!(
                    "C.C.T: {}  |  ZONA ESCOLAR: {}",
                    plan.cct, plan.zona_escolar
                ),
                8.0,
                gray,
            )
            .on_band(theme.color_primario)
            .space_after(2.0),
        ),
        Primitive::Text(
            TextBlock::new(
                "SUBSECRETARÍA DE EDUCACIÓN BÁSICA | PLANO DIDÁCTICO (NEM)",
                8.0,
                gray,
            )
            .on_band(theme.color_primario)
            .space_after(4.0),
        ),
        Primitive::Text(
            TextBlock::new(
                format!("DOCENTE: {}", plan.nombre_docente.to_uppercase()),
                9.0,
                WHITE,
            )
            .on_band(theme.color_primario)
            .space_after(2.0),
        ),
        Primitive::Text(
            TextBlock::new(
                format!(
                    "{} | {} | METODOLOGÍA: {}",
                    plan.grado,
                    plan.fase_nem,
                    plan.metodologia.to_uppercase()
                ),
                9.0,
                WHITE,
            )
            .on_band(theme.color_primario)
            .space_after(4.0),
        ),
        Primitive::Text(
            TextBlock::new(
                format!("PROYECTO: {}", plan.titulo_proyecto.to_uppercase()),
                12.0,
                WHITE,
            )
            .bold()
            .on_band(theme.color_primario)
            .space_after(10.0),
        ),
    ]
}

/// Bloque de fundamentación: diagnóstico, propósito, campos y ejes
fn foundation_section(plan: &LessonPlan, theme: &Theme) -> Vec<Primitive> {
    let label = |texto: &str| Cell::text(texto).bold().filled(theme.relleno_claro);
    vec![
        Primitive::Text(section_title("I. FUNDAMENTACIÓN Y CONTEXTO", theme)),
        Primitive::Table(Table {
            band: None,
            rows: vec![
                Row::new(vec![
                    label("DIAGNÓSTICO"),
                    Cell::text(&plan.diagnostico_socioeducativo),
                ]),
                Row::new(vec![label("PROPÓSITO"), Cell::text(&plan.proposito)]),
                Row::new(vec![
                    label("CAMPOS"),
                    Cell::text(plan.campo_formativo.join(" | ")),
                ]),
                Row::new(vec![
                    label("EJES"),
                    Cell::text(plan.ejes_articuladores.join(" | ")),
                ]),
            ],
            widths: vec![0.22, 0.78],
            font_size: 8.0,
        }),
    ]
}

/// Malla curricular agrupada por asignatura
///
/// Cada grupo es una tabla con banda propia. Cuando un contenido tiene
/// varios PDA, la etiqueta del contenido aparece solo en la primera
/// subfila y se deja en blanco en las siguientes: el primitivo es una
/// fila plana, el agrupado es visual.
fn curriculum_section(plan: &LessonPlan, theme: &Theme) -> Vec<Primitive> {
    let mut out = vec![Primitive::Text(section_title(
        "II. MALLA CURRICULAR VINCULADA",
        theme,
    ))];

    for group in group_by_subject(&plan.vinculacion_contenido_pda) {
        let mut rows = Vec::new();
        for entry in &group.entries {
            if entry.pda_vinculados.is_empty() {
                // Contenido sin PDA: se conserva visible con la celda
                // de PDA en blanco en vez de descartarlo
                rows.push(Row::new(vec![
                    Cell::text(&entry.contenido).bold().filled(theme.relleno_suave),
                    Cell::text(""),
                ]));
                continue;
            }
            for (i, pda) in entry.pda_vinculados.iter().enumerate() {
                let contenido = if i == 0 { entry.contenido.as_str() } else { "" };
                rows.push(Row::new(vec![
                    Cell::text(contenido).bold().filled(theme.relleno_suave),
                    Cell::text(format!("• {}", pda)),
                ]));
            }
        }
        out.push(Primitive::Table(Table {
            band: Some(Band {
                text: group.asignatura.to_uppercase(),
                fill: theme.color_banda,
            }),
            rows,
            widths: vec![0.4, 0.6],
            font_size: 7.5,
        }));
    }
    out
}

/// Secuencia didáctica: una tabla por fase, una fila por sesión
///
/// Siempre abre en página nueva para que las fases arranquen limpias.
fn sequence_section(plan: &LessonPlan, theme: &Theme) -> Vec<Primitive> {
    let mut out = vec![
        Primitive::PageBreak,
        Primitive::Text(section_title("III. PLANO DIDÁCTICO (ACTIVIDADES)", theme)),
    ];
    for fase in &plan.fases_desarrollo {
        out.push(Primitive::Table(phase_table(fase, theme)));
    }
    out
}

fn phase_table(fase: &Phase, theme: &Theme) -> Table {
    let band_text = if fase.descripcion.is_empty() {
        fase.nombre.to_uppercase()
    } else {
        format!("{}\n{}", fase.nombre.to_uppercase(), fase.descripcion)
    };
    let rows = fase
        .sesiones
        .iter()
        .map(|sesion| {
            Row::new(vec![
                Cell::text(format!("SESIÓN {}\n{}", sesion.numero, sesion.duracion))
                    .bold()
                    .centered(),
                Cell::text(session_body(sesion)),
            ])
        })
        .collect();
    Table {
        band: Some(Band {
            text: band_text,
            fill: theme.color_primario,
        }),
        rows,
        widths: vec![0.15, 0.85],
        font_size: 7.0,
    }
}

/// Cuerpo de una sesión: título y los tres momentos en orden, con los
/// recursos y la evaluación como líneas finales
fn session_body(sesion: &Session) -> String {
    let mut body = format!(
        "TÍTULO: {}\n\n• INICIO: {}\n\n• DESARROLLO: {}\n\n• CIERRE: {}\n\nRECURSOS: {}\nEVALUACIÓN: {}",
        sesion.titulo.to_uppercase(),
        sesion.actividades_inicio.join(" "),
        sesion.actividades_desarrollo.join(" "),
        sesion.actividades_cierre.join(" "),
        sesion.recursos.join(", "),
        sesion.evaluacion_sesion,
    );
    if let Some(paj) = &sesion.paj_vinculado {
        body.push_str("\nPAJ: ");
        body.push_str(paj);
    }
    body
}

/// Tabla de evaluación formativa en tres columnas
fn evaluation_section(plan: &LessonPlan, theme: &Theme) -> Vec<Primitive> {
    let ev = &plan.evaluacion_formativa;
    let head = |texto: &str| {
        Cell::text(texto)
            .bold()
            .filled(theme.color_banda)
            .colored(WHITE)
    };
    vec![
        Primitive::Text(section_title("IV. EVALUACIÓN Y BIBLIOGRAFÍA", theme)),
        Primitive::Table(Table {
            band: None,
            rows: vec![
                Row::new(vec![
                    head("TÉCNICAS"),
                    head("INSTRUMENTOS"),
                    head("CRITERIOS"),
                ]),
                Row::new(vec![
                    Cell::text(ev.tecnicas.join("\n")),
                    Cell::text(ev.instrumentos.join("\n")),
                    Cell::text(ev.criterios_evaluacion.join("\n")),
                ]),
            ],
            widths: vec![1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0],
            font_size: 7.5,
        }),
    ]
}

/// Bibliografía especializada
///
/// Si no hay entradas la sección se omite por completo, sin encabezado
/// huérfano.
fn bibliography_section(plan: &LessonPlan, theme: &Theme) -> Vec<Primitive> {
    if plan.bibliografia_especializada.is_empty() {
        return Vec::new();
    }
    let head = |texto: &str| {
        Cell::text(texto)
            .bold()
            .filled(theme.color_banda)
            .colored(WHITE)
    };
    let mut rows = vec![Row::new(vec![
        head("AUTOR"),
        head("AÑO"),
        head("TÍTULO"),
        head("USO"),
    ])];
    for entry in &plan.bibliografia_especializada {
        rows.push(Row::new(vec![
            Cell::text(&entry.autor),
            Cell::text(&entry.anio).centered(),
            Cell::text(&entry.titulo),
            Cell::text(&entry.uso),
        ]));
    }
    vec![
        Primitive::Text(section_title("V. BIBLIOGRAFÍA ESPECIALIZADA", theme)),
        Primitive::Table(Table {
            band: None,
            rows,
            widths: vec![0.25, 0.1, 0.4, 0.25],
            font_size: 7.5,
        }),
    ]
}

fn section_title(texto: &str, theme: &Theme) -> TextBlock {
    TextBlock::new(texto, 10.0, theme.color_primario)
        .bold()
        .space_after(4.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::plan::{Bibliography, ContentPdaPair, Evaluation};
    use crate::normalizer::normalize;
    use serde_json::json;

    fn plan_minimo() -> LessonPlan {
        normalize(&json!({
            "titulo_proyecto": "Huerto escolar",
            "nombre_escuela": "Esc. Benito Juárez",
            "nombre_docente": "María Pérez"
        }))
        .unwrap()
    }

    fn tablas(prims: &[Primitive]) -> Vec<&Table> {
        prims
            .iter()
            .filter_map(|p| match p {
                Primitive::Table(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_orden_de_secciones() {
        let plan = plan_minimo();
        let prims = build_sections(&plan, &Theme::default());

        // La cabecera abre el documento con la escuela en banda
        match &prims[0] {
            Primitive::Text(b) => {
                assert_eq!(b.text, "ESC. BENITO JUÁREZ");
                assert!(b.band_fill.is_some());
            }
            other => panic!("se esperaba texto de cabecera, hay {:?}", other),
        }

        // Hay exactamente un salto explícito y precede a la secuencia
        let salto = prims
            .iter()
            .position(|p| matches!(p, Primitive::PageBreak))
            .unwrap();
        match &prims[salto + 1] {
            Primitive::Text(b) => assert!(b.text.starts_with("III.")),
            other => panic!("tras el salto debe venir el título III, hay {:?}", other),
        }
    }

    #[test]
    fn test_pda_multiple_blanquea_subfilas() {
        let mut plan = plan_minimo();
        plan.vinculacion_contenido_pda = vec![ContentPdaPair {
            asignatura: "Lenguajes".to_string(),
            contenido: "Narración de sucesos".to_string(),
            pda_vinculados: vec!["P1".to_string(), "P2".to_string(), "P3".to_string()],
        }];
        let prims = curriculum_section(&plan, &Theme::default());
        let tabla = tablas(&prims)[0];
        assert_eq!(tabla.rows.len(), 3);
        assert_eq!(tabla.rows[0].cells[0].text, "Narración de sucesos");
        assert_eq!(tabla.rows[1].cells[0].text, "");
        assert_eq!(tabla.rows[2].cells[0].text, "");
        assert_eq!(tabla.rows[2].cells[1].text, "• P3");
    }

    #[test]
    fn test_contenido_sin_pda_se_conserva() {
        let mut plan = plan_minimo();
        plan.vinculacion_contenido_pda = vec![ContentPdaPair {
            asignatura: "Saberes".to_string(),
            contenido: "Ecosistemas".to_string(),
            pda_vinculados: vec![],
        }];
        let prims = curriculum_section(&plan, &Theme::default());
        let tabla = tablas(&prims)[0];
        assert_eq!(tabla.rows.len(), 1);
        assert_eq!(tabla.rows[0].cells[0].text, "Ecosistemas");
        assert_eq!(tabla.rows[0].cells[1].text, "");
    }

    #[test]
    fn test_bibliografia_vacia_se_omite() {
        let plan = plan_minimo();
        assert!(bibliography_section(&plan, &Theme::default()).is_empty());
    }

    #[test]
    fn test_bibliografia_con_entradas() {
        let mut plan = plan_minimo();
        plan.bibliografia_especializada = vec![Bibliography {
            autor: "SEP".to_string(),
            titulo: "Plan de Estudio 2022".to_string(),
            anio: "2022".to_string(),
            uso: "Marco curricular".to_string(),
        }];
        let prims = bibliography_section(&plan, &Theme::default());
        let tabla = tablas(&prims)[0];
        // Encabezado más una fila por entrada
        assert_eq!(tabla.rows.len(), 2);
        assert_eq!(tabla.rows[1].cells[0].text, "SEP");
    }

    #[test]
    fn test_evaluacion_une_con_saltos_de_linea() {
        let mut plan = plan_minimo();
        plan.evaluacion_formativa = Evaluation {
            tecnicas: vec!["Observación".to_string(), "Entrevista".to_string()],
            instrumentos: vec!["Rúbrica".to_string()],
            criterios_evaluacion: vec![],
        };
        let prims = evaluation_section(&plan, &Theme::default());
        let tabla = tablas(&prims)[0];
        assert_eq!(tabla.rows[1].cells[0].text, "Observación\nEntrevista");
        assert_eq!(tabla.rows[1].cells[2].text, "");
    }

    #[test]
    fn test_cuerpo_de_sesion_mantiene_los_tres_momentos() {
        let plan = normalize(&json!({
            "titulo_proyecto": "X",
            "fases_desarrollo": [{
                "nombre": "Planeación",
                "descripcion": "Arranque",
                "sesiones": [{
                    "numero": 1,
                    "titulo": "Lluvia de ideas",
                    "duracion": "50 min",
                    "actividades_inicio": ["Saludo", "Pregunta detonadora"],
                    "actividades_desarrollo": ["Mesa de trabajo"],
                    "actividades_cierre": ["Puesta en común"],
                    "recursos": ["Pizarrón", "Tarjetas"],
                    "evaluacion_sesion": "Lista de cotejo"
                }]
            }]
        }))
        .unwrap();
        let prims = sequence_section(&plan, &Theme::default());
        let tabla = tablas(&prims)[0];
        let cuerpo = &tabla.rows[0].cells[1].text;
        let inicio = cuerpo.find("• INICIO: Saludo Pregunta detonadora").unwrap();
        let desarrollo = cuerpo.find("• DESARROLLO: Mesa de trabajo").unwrap();
        let cierre = cuerpo.find("• CIERRE: Puesta en común").unwrap();
        assert!(inicio < desarrollo && desarrollo < cierre);
        assert!(cuerpo.contains("RECURSOS: Pizarrón, Tarjetas"));
        assert_eq!(tabla.rows[0].cells[0].text, "SESIÓN 1\n50 min");
    }
}
