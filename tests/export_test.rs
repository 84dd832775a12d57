//! Pruebas de extremo a extremo del núcleo de exportación:
//! normalización, secciones, maquetado y los dos backends binarios.

use std::io::{Cursor, Read};

use planeador_nem::layout::engine::{LayoutEngine, PageElement};
use planeador_nem::normalizer::normalize;
use planeador_nem::render::{build_sections, Theme};
use planeador_nem::{export_plan, ExportFormat, ValidationError};
use serde_json::json;

/// Plan completo y realista, como lo devolvería el modelo
fn respuesta_completa() -> serde_json::Value {
    json!({
        "titulo_proyecto": "Guardianes del agua en la comunidad escolar",
        "nombre_docente": "María Pérez",
        "nombre_escuela": "Esc. Sec. Benito Juárez",
        "cct": "15EES0001K",
        "zona_escolar": "12",
        "grado": "1° Secundaria",
        "fase_nem": "Fase 6",
        "metodologia": "Aprendizaje Basado en Problemas (ABP)",
        "campo_formativo": ["Saberes y Pensamiento Científico", "Ética, Naturaleza y Sociedades"],
        "ejes_articuladores": ["Pensamiento crítico", "Vida saludable"],
        "proposito": "Que el alumnado analice el consumo de agua de su escuela y proponga acciones de cuidado.",
        "diagnostico_socioeducativo": "La escuela presenta fugas recurrentes y desperdicio en los bebederos.",
        "temporalidad_realista": "2 semanas / 8 sesiones",
        "vinculacion_contenido_pda": [
            {
                "asignatura": "Saberes y Pensamiento Científico",
                "contenido": "El agua como recurso vital",
                "pda_vinculados": ["P1", "P2", "P3"]
            },
            {
                "asignatura": "Ética, Naturaleza y Sociedades",
                "contenido": "Responsabilidad ambiental",
                "pda_vinculados": ["P4"]
            }
        ],
        "fases_desarrollo": [
            {
                "nombre": "Presentamos",
                "descripcion": "Planteamiento de la situación problema",
                "sesiones": [
                    {
                        "numero": 1,
                        "titulo": "¿A dónde se va el agua?",
                        "duracion": "50 min",
                        "actividades_inicio": ["Lluvia de ideas sobre el uso del agua"],
                        "actividades_desarrollo": ["Recorrido por la escuela registrando fugas"],
                        "actividades_cierre": ["Puesta en común de hallazgos"],
                        "recursos": ["Bitácora", "Lápices"],
                        "evaluacion_sesion": "Registro de observaciones"
                    },
                    {
                        "numero": 2,
                        "titulo": "Medimos el desperdicio",
                        "duracion": "50 min",
                        "actividades_inicio": ["Recuperación de la sesión anterior"],
                        "actividades_desarrollo": ["Cálculo del volumen desperdiciado por fuga"],
                        "actividades_cierre": ["Gráfica grupal de resultados"],
                        "recursos": ["Cronómetro", "Recipientes graduados"],
                        "evaluacion_sesion": "Tabla de mediciones"
                    }
                ]
            }
        ],
        "evaluacion_formativa": {
            "tecnicas": ["Observación sistemática"],
            "instrumentos": ["Rúbrica", "Lista de cotejo"],
            "criterios_evaluacion": ["Participación", "Rigor en las mediciones"]
        },
        "bibliografia_especializada": [
            {
                "autor": "SEP",
                "titulo": "Programa Sintético Fase 6",
                "año": "2022",
                "uso": "Vinculación curricular"
            }
        ]
    })
}

fn leer_parte(bytes: &[u8], nombre: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let mut parte = archive.by_name(nombre).unwrap();
    let mut contenido = String::new();
    parte.read_to_string(&mut contenido).unwrap();
    contenido
}

#[test]
fn test_entrada_minima_exporta_con_secciones_vacias() {
    // Solo título, escuela y docente; todo lo demás ausente
    let value = json!({
        "titulo_proyecto": "X",
        "nombre_escuela": "Y",
        "nombre_docente": "Z",
        "fases_desarrollo": []
    });
    let plan = normalize(&value).unwrap();

    let pdf = export_plan(&plan, ExportFormat::Pdf).unwrap();
    assert!(pdf.bytes.starts_with(b"%PDF"));
    let reloaded = lopdf::Document::load_mem(&pdf.bytes).unwrap();
    assert!(!reloaded.get_pages().is_empty());

    let docx = export_plan(&plan, ExportFormat::Docx).unwrap();
    let doc = leer_parte(&docx.bytes, "word/document.xml");
    // La cabecera va poblada
    assert!(doc.contains("DOCENTE: Z"));
    assert!(doc.contains("PROYECTO: X"));
    // Sin bibliografía no hay sección de bibliografía
    assert!(!doc.contains("BIBLIOGRAFÍA ESPECIALIZADA"));
}

#[test]
fn test_sin_titulo_no_se_renderiza_nada() {
    assert_eq!(normalize(&json!({})), Err(ValidationError::MissingTitle));
}

#[test]
fn test_exportacion_completa_en_ambos_formatos() {
    let plan = normalize(&respuesta_completa()).unwrap();

    let pdf = export_plan(&plan, ExportFormat::Pdf).unwrap();
    assert_eq!(pdf.filename, "Planeacion_NEM_Guardianes_del.pdf");
    assert!(lopdf::Document::load_mem(&pdf.bytes).is_ok());

    let docx = export_plan(&plan, ExportFormat::Docx).unwrap();
    assert_eq!(docx.filename, "Planeacion_NEM_Guardianes_del.docx");
    let doc = leer_parte(&docx.bytes, "word/document.xml");

    // Las seis secciones en orden, con la bibliografía presente
    let indices: Vec<usize> = [
        "ESC. SEC. BENITO JUÁREZ",
        "I. FUNDAMENTACIÓN Y CONTEXTO",
        "II. MALLA CURRICULAR VINCULADA",
        "III. PLANO DIDÁCTICO (ACTIVIDADES)",
        "IV. EVALUACIÓN Y BIBLIOGRAFÍA",
        "V. BIBLIOGRAFÍA ESPECIALIZADA",
    ]
    .iter()
    .map(|s| doc.find(s).unwrap_or_else(|| panic!("falta la sección {}", s)))
    .collect();
    let mut ordenados = indices.clone();
    ordenados.sort_unstable();
    assert_eq!(indices, ordenados, "las secciones deben conservar su orden");

    // Agrupado visual: P2 y P3 van bajo el mismo contenido
    assert!(doc.contains("• P2"));
    assert!(doc.contains("• P3"));
}

#[test]
fn test_exportar_dos_veces_da_el_mismo_contenido() {
    let plan = normalize(&respuesta_completa()).unwrap();

    let pdf_a = export_plan(&plan, ExportFormat::Pdf).unwrap();
    let pdf_b = export_plan(&plan, ExportFormat::Pdf).unwrap();
    assert_eq!(pdf_a.bytes, pdf_b.bytes);

    // El paquete Word lleva fecha de creación en los metadatos; el
    // contenido estructural se compara por su parte principal
    let docx_a = export_plan(&plan, ExportFormat::Docx).unwrap();
    let docx_b = export_plan(&plan, ExportFormat::Docx).unwrap();
    assert_eq!(
        leer_parte(&docx_a.bytes, "word/document.xml"),
        leer_parte(&docx_b.bytes, "word/document.xml")
    );
}

#[test]
fn test_fase_con_doce_sesiones_reparte_en_varias_paginas() {
    let mut value = respuesta_completa();
    let actividades: Vec<String> = (0..6)
        .map(|i| {
            format!(
                "Actividad {} con registro en bitácora, discusión por equipos \
                 y elaboración de conclusiones para compartir con la comunidad",
                i
            )
        })
        .collect();
    let sesiones: Vec<serde_json::Value> = (1..=12)
        .map(|n| {
            json!({
                "numero": n,
                "titulo": format!("Sesión de indagación {}", n),
                "duracion": "50 min",
                "actividades_inicio": actividades.clone(),
                "actividades_desarrollo": actividades.clone(),
                "actividades_cierre": actividades.clone(),
                "recursos": ["Bitácora"],
                "evaluacion_sesion": "Registro"
            })
        })
        .collect();
    value["fases_desarrollo"] = json!([{
        "nombre": "Vivamos la experiencia",
        "descripcion": "Fase intensiva",
        "sesiones": sesiones
    }]);
    let plan = normalize(&value).unwrap();

    let theme = Theme::default();
    let sections = build_sections(&plan, &theme);
    let mut engine = LayoutEngine::new(&theme);
    engine.place_all(&sections);
    let pages = engine.finish();
    assert!(pages.len() >= 3, "cabecera mas doce sesiones largas piden varias páginas");

    // Cada sesión conserva sus tres momentos en orden en la página donde caiga
    let textos: Vec<String> = pages
        .iter()
        .flat_map(|p| p.elements.iter())
        .filter_map(|e| match e {
            PageElement::Text(t) => Some(t.text.clone()),
            _ => None,
        })
        .collect();
    let todo = textos.join("\n");
    for n in 1..=12 {
        assert!(
            todo.contains(&format!("SESIÓN {}", n)),
            "falta la sesión {}",
            n
        );
    }
    let inicio = todo.find("• INICIO:").unwrap();
    let desarrollo = todo.find("• DESARROLLO:").unwrap();
    let cierre = todo.find("• CIERRE:").unwrap();
    assert!(inicio < desarrollo && desarrollo < cierre);

    // Y el PDF final pagina igual que el motor
    let pdf = export_plan(&plan, ExportFormat::Pdf).unwrap();
    let reloaded = lopdf::Document::load_mem(&pdf.bytes).unwrap();
    assert_eq!(reloaded.get_pages().len(), pages.len());
}

#[test]
fn test_bibliografia_vacia_omite_la_seccion_en_ambos_formatos() {
    let mut value = respuesta_completa();
    value["bibliografia_especializada"] = json!([]);
    let plan = normalize(&value).unwrap();

    let docx = export_plan(&plan, ExportFormat::Docx).unwrap();
    let doc = leer_parte(&docx.bytes, "word/document.xml");
    assert!(!doc.contains("BIBLIOGRAFÍA ESPECIALIZADA"));

    let theme = Theme::default();
    let sections = build_sections(&plan, &theme);
    let titulos: Vec<&str> = sections
        .iter()
        .filter_map(|p| match p {
            planeador_nem::render::Primitive::Text(b) if b.text.starts_with("V.") => {
                Some(b.text.as_str())
            }
            _ => None,
        })
        .collect();
    assert!(titulos.is_empty());
}

#[tokio::test]
async fn test_exportaciones_concurrentes_no_comparten_estado() {
    // Dos exportaciones simultáneas del mismo plan deben producir lo
    // mismo que dos consecutivas
    let plan = normalize(&respuesta_completa()).unwrap();
    let plan_b = plan.clone();

    let a = tokio::task::spawn_blocking(move || export_plan(&plan, ExportFormat::Pdf));
    let b = tokio::task::spawn_blocking(move || export_plan(&plan_b, ExportFormat::Docx));
    let (a, b) = tokio::join!(a, b);
    let pdf = a.unwrap().unwrap();
    let docx = b.unwrap().unwrap();

    let plan_de_nuevo = normalize(&respuesta_completa()).unwrap();
    let pdf_secuencial = export_plan(&plan_de_nuevo, ExportFormat::Pdf).unwrap();
    assert_eq!(pdf.bytes, pdf_secuencial.bytes);
    assert!(docx.bytes.starts_with(b"PK\x03\x04"));
}
